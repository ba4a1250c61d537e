//! Telegram wire types — inbound updates and outbound keyboard markup.
//!
//! DESIGN
//! ======
//! Inbound payloads are parsed into a closed schema at the webhook boundary:
//! an update is either a message or a callback query, anything else is
//! [`UpdateKind::Malformed`] and gets dropped upstream. Callback data strings
//! are likewise parsed exactly once into [`CallbackAction`]; downstream code
//! matches on the variant, never on raw strings.

use serde::{Deserialize, Serialize};

use crate::currency::FIAT_ANCHOR;

/// Callback-data prefix for "convert fiat into this asset" buttons.
pub const CONVERT_FROM_FIAT_PREFIX: &str = "convert_from_try_";

/// Callback-data prefix for "convert this asset into fiat" buttons.
pub const CONVERT_TO_FIAT_PREFIX: &str = "convert_to_try_";

// =============================================================================
// INBOUND UPDATE SHAPES
// =============================================================================

/// One Telegram webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: Option<i64>,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

/// A text message update.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Unknown,
}

impl ChatKind {
    /// Group and supergroup chats share the group command rules.
    #[must_use]
    pub fn is_group(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

/// A button-press callback update.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Identifier to acknowledge via `answerCallbackQuery`.
    pub id: String,
    pub from: Option<User>,
    /// Opaque action string attached to the pressed button.
    pub data: Option<String>,
    /// The message the keyboard was attached to; carries the chat.
    pub message: Option<Message>,
}

/// Classified update shape.
#[derive(Debug)]
pub enum UpdateKind {
    Message(Message),
    Callback(CallbackQuery),
    /// Neither a message nor a callback — logged and dropped.
    Malformed,
}

impl Update {
    #[must_use]
    pub fn into_kind(self) -> UpdateKind {
        match (self.message, self.callback_query) {
            (Some(message), _) => UpdateKind::Message(message),
            (None, Some(callback)) => UpdateKind::Callback(callback),
            (None, None) => UpdateKind::Malformed,
        }
    }
}

// =============================================================================
// CALLBACK ACTIONS
// =============================================================================

/// Parsed callback-data action. Produced by a single parse step at the router
/// boundary; unrecognized data maps to [`CallbackAction::Other`] and is
/// ignored, not treated as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Prices,
    ConvertMenu,
    Transactions,
    Admin,
    MainMenu,
    /// Convert fiat into the carried asset symbol (uppercase).
    FiatToAsset(String),
    /// Convert the carried asset symbol (uppercase) into fiat.
    AssetToFiat(String),
    Other,
}

impl CallbackAction {
    #[must_use]
    pub fn parse(data: &str) -> Self {
        match data {
            "prices" => Self::Prices,
            "convert_menu" => Self::ConvertMenu,
            "transactions" => Self::Transactions,
            "admin" => Self::Admin,
            "main_menu" => Self::MainMenu,
            _ => {
                if let Some(asset) = data.strip_prefix(CONVERT_FROM_FIAT_PREFIX) {
                    Self::FiatToAsset(asset.to_uppercase())
                } else if let Some(asset) = data.strip_prefix(CONVERT_TO_FIAT_PREFIX) {
                    Self::AssetToFiat(asset.to_uppercase())
                } else {
                    Self::Other
                }
            }
        }
    }
}

// =============================================================================
// OUTBOUND KEYBOARDS
// =============================================================================

/// Inline keyboard: rows of buttons shown under an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// A single button carrying either a callback action or a direct URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineKeyboardButton {
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self { text: text.into(), callback_data: Some(data.into()), url: None }
    }

    #[must_use]
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self { text: text.into(), callback_data: None, url: Some(url.into()) }
    }
}

/// Callback data for a "convert fiat into `asset`" button.
#[must_use]
pub fn fiat_to_asset_data(asset: &str) -> String {
    format!("{CONVERT_FROM_FIAT_PREFIX}{asset}")
}

/// Callback data for a "convert `asset` into fiat" button.
#[must_use]
pub fn asset_to_fiat_data(asset: &str) -> String {
    format!("{CONVERT_TO_FIAT_PREFIX}{asset}")
}

/// Button label for a conversion direction, e.g. `TRY → BTC`.
#[must_use]
pub fn direction_label(from: &str, to: &str) -> String {
    debug_assert!(from == FIAT_ANCHOR || to == FIAT_ANCHOR);
    format!("{from} → {to}")
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
