//! Conversion engine — numeric logic across the fiat/asset boundary.
//!
//! DESIGN
//! ======
//! Pure math on top of one oracle quote: fiat → asset divides by the unit
//! price, asset → fiat multiplies. [`execute`] classifies the pair first, so
//! anything outside fiat-anchor ↔ supported-asset fails before any network
//! call. A quote that lacks the requested symbol is an error, never a zero.

use crate::currency::{self, PairKind};
use crate::oracle::{OracleError, PriceOracle};

/// Discount percentages for the breakdown table, in display order.
pub const BREAKDOWN_PERCENTS: &[u32] = &[10, 15, 20, 25, 30, 35, 40, 45, 50];

/// Errors produced by the conversion engine.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The pair is not fiat-anchor ↔ supported-asset in either direction.
    #[error("unsupported currency pair: {from} -> {to}")]
    UnsupportedPair { from: String, to: String },

    /// A single-sided conversion named a symbol outside the supported set.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// The oracle answered but had no price for the symbol.
    #[error("no price available for {0}")]
    PriceUnavailable(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Outcome of one conversion, with the fiat-side amount kept for the
/// percentage breakdown.
#[derive(Debug, Clone, Copy)]
pub struct Conversion {
    pub from_amount: f64,
    pub to_amount: f64,
    /// Whichever side of the conversion was denominated in the fiat anchor.
    pub fiat_amount: f64,
}

async fn unit_price(oracle: &dyn PriceOracle, asset: &str) -> Result<f64, ConvertError> {
    if !currency::is_supported_asset(asset) {
        return Err(ConvertError::UnsupportedCurrency(asset.to_string()));
    }
    let quote = oracle.quote(&[asset]).await?;
    quote
        .price(asset)
        .ok_or_else(|| ConvertError::PriceUnavailable(asset.to_string()))
}

/// Convert a fiat amount into `asset` at the current unit price.
///
/// # Errors
///
/// Fails if `asset` is unsupported, unpriced, or the oracle call fails.
pub async fn convert_fiat_to_asset(oracle: &dyn PriceOracle, amount: f64, asset: &str) -> Result<f64, ConvertError> {
    let price = unit_price(oracle, asset).await?;
    Ok(amount / price)
}

/// Convert an `asset` amount into fiat at the current unit price.
///
/// # Errors
///
/// Fails if `asset` is unsupported, unpriced, or the oracle call fails.
pub async fn convert_asset_to_fiat(oracle: &dyn PriceOracle, amount: f64, asset: &str) -> Result<f64, ConvertError> {
    let price = unit_price(oracle, asset).await?;
    Ok(amount * price)
}

/// Classify the pair and run the conversion in the right direction.
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedPair`] for pairs outside the
/// fiat-anchor ↔ supported-asset form; otherwise propagates price errors.
pub async fn execute(oracle: &dyn PriceOracle, amount: f64, from: &str, to: &str) -> Result<Conversion, ConvertError> {
    match currency::classify_pair(from, to) {
        Some(PairKind::FiatToAsset { asset }) => {
            let to_amount = convert_fiat_to_asset(oracle, amount, asset).await?;
            Ok(Conversion { from_amount: amount, to_amount, fiat_amount: amount })
        }
        Some(PairKind::AssetToFiat { asset }) => {
            let to_amount = convert_asset_to_fiat(oracle, amount, asset).await?;
            Ok(Conversion { from_amount: amount, to_amount, fiat_amount: to_amount })
        }
        None => Err(ConvertError::UnsupportedPair { from: from.to_string(), to: to.to_string() }),
    }
}

/// One row of the discount breakdown table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakdownRow {
    pub percent: u32,
    pub discounted_fiat: f64,
    pub asset_amount: f64,
}

/// Discount table for a fiat amount at a given unit price: for each percent
/// `p`, the fiat amount after a `p`% cut and its asset equivalent. Pure
/// function of its inputs; no state.
#[must_use]
pub fn percentage_breakdown(fiat_amount: f64, unit_price: f64) -> Vec<BreakdownRow> {
    BREAKDOWN_PERCENTS
        .iter()
        .map(|&percent| {
            let discounted_fiat = fiat_amount * (1.0 - f64::from(percent) / 100.0);
            BreakdownRow { percent, discounted_fiat, asset_amount: discounted_fiat / unit_price }
        })
        .collect()
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod tests;
