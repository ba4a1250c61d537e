use super::*;
use crate::state::test_helpers::MemoryStore;

fn new_txn(from: &str, to: &str) -> NewTransaction {
    NewTransaction {
        user_id: 7,
        from_currency: from.to_string(),
        to_currency: to.to_string(),
        from_amount: 100.0,
        to_amount: 0.00005,
    }
}

#[tokio::test]
async fn record_accepts_both_directions() {
    let store = MemoryStore::new();

    let stored = record(&store, new_txn("TRY", "BTC")).await.unwrap();
    assert_eq!(stored.user_id, 7);
    assert_eq!(stored.from_currency, "TRY");
    assert_eq!(stored.to_currency, "BTC");

    record(&store, new_txn("XMR", "TRY")).await.unwrap();
    assert_eq!(store.rows.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn record_rejects_pairs_off_the_anchor() {
    let store = MemoryStore::new();

    for (from, to) in [("TRY", "TRY"), ("BTC", "DOGE"), ("TRY", "EUR"), ("ETH", "TRY"), ("usd", "BTC")] {
        let err = record(&store, new_txn(from, to)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPair { .. }), "{from}->{to} should be rejected");
    }
    assert!(store.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn record_propagates_store_failures() {
    let store = MemoryStore::failing();
    let err = record(&store, new_txn("TRY", "BTC")).await.unwrap_err();
    assert!(matches!(err, LedgerError::Database(_)));
}

#[tokio::test]
async fn listings_are_newest_first() {
    let store = MemoryStore::new();
    record(&store, new_txn("TRY", "BTC")).await.unwrap();
    record(&store, new_txn("TRY", "DOGE")).await.unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].timestamp >= all[1].timestamp);

    let mine = store.list_for_user(7).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(store.list_for_user(999).await.unwrap().is_empty());
}

// =========================================================================
// Live database tests. Require a running Postgres with the migrations
// applied and DATABASE_URL set; run with:
//   cargo test --features live-db-tests -- --test-threads=1
// =========================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::super::*;

    async fn live_store() -> PgTransactionStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for live-db-tests");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect to test database");
        PgTransactionStore::new(pool)
    }

    #[tokio::test]
    async fn insert_round_trips_through_postgres() {
        let store = live_store().await;
        let user_id = i64::from(rand_user());

        let stored = store
            .insert(&NewTransaction {
                user_id,
                from_currency: "TRY".into(),
                to_currency: "BTC".into(),
                from_amount: 250.0,
                to_amount: 0.000125,
            })
            .await
            .unwrap();
        assert_eq!(stored.user_id, user_id);

        let mine = store.list_for_user(user_id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, stored.id);
        assert_eq!(mine[0].from_currency, "TRY");
        assert!((mine[0].from_amount - 250.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn list_all_orders_newest_first() {
        let store = live_store().await;
        let user_id = i64::from(rand_user());

        for to in ["BTC", "DOGE"] {
            store
                .insert(&NewTransaction {
                    user_id,
                    from_currency: "TRY".into(),
                    to_currency: to.into(),
                    from_amount: 10.0,
                    to_amount: 1.0,
                })
                .await
                .unwrap();
        }

        let mine = store.list_for_user(user_id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].to_currency, "DOGE");
        assert!(mine[0].timestamp >= mine[1].timestamp);
    }

    // Distinct user ids keep runs from stepping on each other's rows.
    fn rand_user() -> u32 {
        let nanos = std::time::UNIX_EPOCH.elapsed().map_or(0, |d| d.subsec_nanos());
        std::process::id().wrapping_mul(31).wrapping_add(nanos)
    }
}
