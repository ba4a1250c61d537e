//! Price oracle — current fiat unit prices for supported assets.
//!
//! DESIGN
//! ======
//! The conversion engine only sees the [`PriceOracle`] trait and a
//! [`PriceQuote`] snapshot, so tests can pin prices without network access.
//! The production implementation is the CoinGecko `simple/price` endpoint,
//! which prices a batch of assets in TRY in one request. Symbols the API
//! cannot price are simply absent from the quote; missing prices must be
//! surfaced by callers, never defaulted to zero.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::HttpTimeouts;

/// CoinGecko asset ids for the supported symbols, keyed by lowercase symbol.
const COIN_IDS: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("usdt", "tether"),
    ("trx", "tron"),
    ("xmr", "monero"),
    ("doge", "dogecoin"),
];

fn coin_id(symbol: &str) -> Option<&'static str> {
    COIN_IDS.iter().find(|(s, _)| *s == symbol).map(|(_, id)| *id)
}

fn symbol_for_id(id: &str) -> Option<&'static str> {
    COIN_IDS.iter().find(|(_, i)| *i == id).map(|(s, _)| *s)
}

// =============================================================================
// TYPES
// =============================================================================

/// One oracle call's worth of prices: lowercase symbol → fiat unit price.
/// Ephemeral; valid only for the request that fetched it.
#[derive(Debug, Clone, Default)]
pub struct PriceQuote {
    prices: HashMap<String, f64>,
}

impl PriceQuote {
    #[must_use]
    pub fn new(prices: HashMap<String, f64>) -> Self {
        Self { prices }
    }

    /// Fiat unit price for `symbol` (case-insensitive), if the oracle had one.
    #[must_use]
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(&symbol.to_lowercase()).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Errors produced by price oracle operations.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The HTTP request to the oracle failed.
    #[error("oracle request failed: {0}")]
    Request(String),

    /// The oracle returned a non-success HTTP status.
    #[error("oracle response error: status {status}")]
    Response { status: u16, body: String },

    /// The oracle response body could not be deserialized.
    #[error("oracle response parse failed: {0}")]
    Parse(String),
}

/// Async trait for fetching a batch price quote. Enables mocking in tests.
#[async_trait::async_trait]
pub trait PriceOracle: Send + Sync {
    /// Fetch current fiat unit prices for `symbols`. Symbols the oracle
    /// cannot price are omitted from the returned quote.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] if the request fails or the response is
    /// malformed.
    async fn quote(&self, symbols: &[&str]) -> Result<PriceQuote, OracleError>;
}

// =============================================================================
// COINGECKO CLIENT
// =============================================================================

pub struct CoinGeckoOracle {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoOracle {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| OracleError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait::async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn quote(&self, symbols: &[&str]) -> Result<PriceQuote, OracleError> {
        let ids = ids_for_symbols(symbols);
        if ids.is_empty() {
            return Ok(PriceQuote::default());
        }

        let url = format!("{}/simple/price", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[("ids", ids.join(",")), ("vs_currencies", "try".to_string())])
            .send()
            .await
            .map_err(|e| OracleError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| OracleError::Request(e.to_string()))?;
        if status != 200 {
            return Err(OracleError::Response { status, body: text });
        }

        let body: HashMap<String, HashMap<String, f64>> =
            serde_json::from_str(&text).map_err(|e| OracleError::Parse(e.to_string()))?;
        Ok(quote_from_response(&body))
    }
}

fn ids_for_symbols(symbols: &[&str]) -> Vec<&'static str> {
    symbols
        .iter()
        .filter_map(|s| coin_id(&s.to_lowercase()))
        .collect()
}

/// Map the CoinGecko response (`id → {currency → price}`) back to lowercase
/// symbols, dropping ids without a TRY price.
fn quote_from_response(body: &HashMap<String, HashMap<String, f64>>) -> PriceQuote {
    let mut prices = HashMap::new();
    for (id, currencies) in body {
        let Some(symbol) = symbol_for_id(id) else {
            continue;
        };
        if let Some(price) = currencies.get("try") {
            prices.insert(symbol.to_string(), *price);
        }
    }
    PriceQuote::new(prices)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
