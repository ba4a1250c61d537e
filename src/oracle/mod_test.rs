use super::*;

fn response(entries: &[(&str, f64)]) -> HashMap<String, HashMap<String, f64>> {
    entries
        .iter()
        .map(|(id, price)| ((*id).to_string(), HashMap::from([("try".to_string(), *price)])))
        .collect()
}

#[test]
fn quote_lookup_is_case_insensitive() {
    let quote = PriceQuote::new(HashMap::from([("btc".to_string(), 2_000_000.0)]));
    assert_eq!(quote.price("BTC"), Some(2_000_000.0));
    assert_eq!(quote.price("btc"), Some(2_000_000.0));
    assert_eq!(quote.price("XMR"), None);
}

#[test]
fn every_supported_asset_has_a_coin_id() {
    for symbol in crate::currency::SUPPORTED_ASSETS {
        assert!(coin_id(&symbol.to_lowercase()).is_some(), "no coin id for {symbol}");
    }
}

#[test]
fn ids_for_symbols_skips_unknown() {
    let ids = ids_for_symbols(&["BTC", "ETH", "doge"]);
    assert_eq!(ids, vec!["bitcoin", "dogecoin"]);
}

#[test]
fn response_maps_ids_back_to_symbols() {
    let body = response(&[("bitcoin", 2_000_000.0), ("tron", 8.5)]);
    let quote = quote_from_response(&body);
    assert_eq!(quote.price("BTC"), Some(2_000_000.0));
    assert_eq!(quote.price("TRX"), Some(8.5));
}

#[test]
fn response_omits_unknown_ids_and_missing_fiat() {
    let mut body = response(&[("bitcoin", 2_000_000.0), ("some-other-coin", 1.0)]);
    // An id priced only in USD contributes nothing.
    body.insert("monero".to_string(), HashMap::from([("usd".to_string(), 160.0)]));

    let quote = quote_from_response(&body);
    assert_eq!(quote.price("BTC"), Some(2_000_000.0));
    assert_eq!(quote.price("XMR"), None);
    assert_eq!(quote.price("SOME-OTHER-COIN"), None);
}

#[tokio::test]
async fn empty_symbol_list_skips_the_request() {
    // Unroutable base URL: the client must not touch the network for [].
    let oracle = CoinGeckoOracle::new(
        "http://127.0.0.1:1",
        crate::config::HttpTimeouts { request_secs: 1, connect_secs: 1 },
    )
    .unwrap();
    let quote = oracle.quote(&[]).await.unwrap();
    assert!(quote.is_empty());
}
