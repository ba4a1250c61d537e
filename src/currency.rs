//! Currency universe — the fiat anchor and the fixed supported asset set.
//!
//! DESIGN
//! ======
//! Every conversion is denominated against a single fiat anchor (TRY). A pair
//! is valid only when exactly one side is the anchor and the other side is a
//! supported asset. Symbols are uppercase everywhere past the parse boundary.

/// The single fiat currency all conversions are denominated against.
pub const FIAT_ANCHOR: &str = "TRY";

/// Crypto symbols the bot converts to/from the fiat anchor. Fixed at build
/// time; not user-editable.
pub const SUPPORTED_ASSETS: &[&str] = &["BTC", "USDT", "TRX", "XMR", "DOGE"];

/// Whether `symbol` is one of the supported crypto assets.
#[must_use]
pub fn is_supported_asset(symbol: &str) -> bool {
    SUPPORTED_ASSETS.contains(&symbol)
}

/// Direction of a valid conversion pair, carrying the asset side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind<'a> {
    /// Fiat anchor on the left, supported asset on the right.
    FiatToAsset { asset: &'a str },
    /// Supported asset on the left, fiat anchor on the right.
    AssetToFiat { asset: &'a str },
}

/// Classify a currency pair. Returns `None` unless exactly one side is the
/// fiat anchor and the other a supported asset.
#[must_use]
pub fn classify_pair<'a>(from: &'a str, to: &'a str) -> Option<PairKind<'a>> {
    if from == FIAT_ANCHOR && is_supported_asset(to) {
        Some(PairKind::FiatToAsset { asset: to })
    } else if is_supported_asset(from) && to == FIAT_ANCHOR {
        Some(PairKind::AssetToFiat { asset: from })
    } else {
        None
    }
}
