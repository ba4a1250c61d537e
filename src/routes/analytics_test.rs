use super::*;

use crate::services::ledger::{NewTransaction, TransactionStore};
use crate::state::test_helpers::{MockOracle, test_app_state};

#[tokio::test]
async fn empty_history_reports_zeroes() {
    let (state, _, _) = test_app_state(MockOracle::default());

    let Json(body) = report(State(state)).await.unwrap();
    assert_eq!(body.stats.total_transactions, 0);
    assert_eq!(body.stats.unique_users, 0);
    assert!(body.users.is_empty());
}

#[tokio::test]
async fn aggregates_the_full_history() {
    let (state, _, store) = test_app_state(MockOracle::default());
    for (user_id, from, to, from_amount, to_amount) in [
        (7, "TRY", "BTC", 100.0, 0.00005),
        (7, "BTC", "TRY", 0.001, 50.0),
        (8, "TRY", "DOGE", 30.0, 300.0),
    ] {
        store
            .insert(&NewTransaction {
                user_id,
                from_currency: from.into(),
                to_currency: to.into(),
                from_amount,
                to_amount,
            })
            .await
            .unwrap();
    }

    let Json(body) = report(State(state)).await.unwrap();
    assert_eq!(body.stats.total_transactions, 3);
    assert_eq!(body.stats.unique_users, 2);
    assert!((body.stats.total_fiat_volume - 180.0).abs() < 1e-9);
    assert_eq!(body.users.len(), 2);

    let user7 = body.users.iter().find(|u| u.user_id == 7).unwrap();
    assert_eq!(user7.total_transactions, 2);
    assert!((user7.total_fiat_volume - 150.0).abs() < 1e-9);
}

#[tokio::test]
async fn response_shape_matches_the_dashboard() {
    let (state, _, store) = test_app_state(MockOracle::default());
    store
        .insert(&NewTransaction {
            user_id: 7,
            from_currency: "TRY".into(),
            to_currency: "BTC".into(),
            from_amount: 100.0,
            to_amount: 0.00005,
        })
        .await
        .unwrap();

    let Json(body) = report(State(state)).await.unwrap();
    let json = serde_json::to_value(&body).unwrap();
    assert!(json["stats"].get("totalTransactions").is_some());
    assert!(json["stats"].get("mostPopularCurrency").is_some());
    assert!(json["users"][0].get("totalFiatVolume").is_some());
    assert!(json["users"][0].get("lastActive").is_some());
}
