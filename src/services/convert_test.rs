use super::*;
use crate::state::test_helpers::MockOracle;

const BTC_TRY: f64 = 2_000_000.0;

fn oracle() -> MockOracle {
    MockOracle::with_prices(&[("BTC", BTC_TRY), ("TRX", 10.0)])
}

#[tokio::test]
async fn fiat_to_asset_divides_by_price() {
    let result = convert_fiat_to_asset(&oracle(), 100.0, "BTC").await.unwrap();
    assert!((result - 0.00005).abs() < 1e-12);
}

#[tokio::test]
async fn asset_to_fiat_multiplies_by_price() {
    let result = convert_asset_to_fiat(&oracle(), 0.001, "BTC").await.unwrap();
    assert!((result - 2000.0).abs() < 1e-9);
}

#[tokio::test]
async fn round_trip_recovers_the_amount() {
    let oracle = oracle();
    for amount in [0.1, 1.0, 42.5, 1_000_000.0] {
        let fiat = convert_asset_to_fiat(&oracle, amount, "BTC").await.unwrap();
        let back = convert_fiat_to_asset(&oracle, fiat, "BTC").await.unwrap();
        assert!((back - amount).abs() < amount * 1e-12, "round trip drifted for {amount}");
    }
}

#[tokio::test]
async fn unsupported_asset_fails_before_the_oracle() {
    // The failing oracle proves no call was made.
    let err = convert_fiat_to_asset(&MockOracle::failing(), 100.0, "ETH")
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedCurrency(sym) if sym == "ETH"));
}

#[tokio::test]
async fn missing_price_is_an_error_not_zero() {
    // XMR is supported but the quote has no price for it.
    let err = convert_fiat_to_asset(&oracle(), 100.0, "XMR").await.unwrap_err();
    assert!(matches!(err, ConvertError::PriceUnavailable(sym) if sym == "XMR"));
}

#[tokio::test]
async fn oracle_failure_propagates() {
    let err = convert_asset_to_fiat(&MockOracle::failing(), 1.0, "BTC")
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Oracle(_)));
}

#[tokio::test]
async fn execute_fiat_to_asset_keeps_fiat_side() {
    let conv = execute(&oracle(), 100.0, "TRY", "BTC").await.unwrap();
    assert!((conv.to_amount - 0.00005).abs() < 1e-12);
    assert!((conv.fiat_amount - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn execute_asset_to_fiat_keeps_fiat_side() {
    let conv = execute(&oracle(), 0.001, "BTC", "TRY").await.unwrap();
    assert!((conv.to_amount - 2000.0).abs() < 1e-9);
    assert!((conv.fiat_amount - 2000.0).abs() < 1e-9);
}

#[tokio::test]
async fn execute_rejects_invalid_pairs() {
    for (from, to) in [("TRY", "TRY"), ("BTC", "DOGE"), ("USD", "BTC"), ("TRY", "ETH")] {
        let err = execute(&oracle(), 1.0, from, to).await.unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedPair { .. }), "{from} -> {to}");
    }
}

#[test]
fn breakdown_covers_percents_in_order() {
    let rows = percentage_breakdown(100.0, 10.0);
    let percents: Vec<u32> = rows.iter().map(|r| r.percent).collect();
    assert_eq!(percents, vec![10, 15, 20, 25, 30, 35, 40, 45, 50]);
}

#[test]
fn breakdown_math_matches_formula() {
    let rows = percentage_breakdown(100.0, 10.0);
    assert!((rows[0].discounted_fiat - 90.0).abs() < 1e-9);
    assert!((rows[0].asset_amount - 9.0).abs() < 1e-9);
    assert!((rows[8].discounted_fiat - 50.0).abs() < 1e-9);
    assert!((rows[8].asset_amount - 5.0).abs() < 1e-9);
}

#[test]
fn breakdown_is_strictly_decreasing() {
    let rows = percentage_breakdown(1234.56, 7.89);
    for pair in rows.windows(2) {
        assert!(pair[1].discounted_fiat < pair[0].discounted_fiat);
        assert!(pair[1].asset_amount < pair[0].asset_amount);
    }
}

#[test]
fn breakdown_is_restartable() {
    let a = percentage_breakdown(500.0, 2.5);
    let b = percentage_breakdown(500.0, 2.5);
    assert_eq!(a, b);
}
