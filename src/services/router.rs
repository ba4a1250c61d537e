//! Update router — command dispatch and the per-chat conversion state machine.
//!
//! DESIGN
//! ======
//! One call per webhook delivery. Messages are routed in strict precedence:
//! a pending conversion intent consumes the message first (one shot, cleared
//! on any content), then group chats only honor the inline `/convert`
//! command, then private chats dispatch on exact command text. Callback
//! updates are parsed once into `CallbackAction` and always acknowledged
//! exactly once, whatever the branch did.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Engine errors become user replies, transport
//! failures are logged and dropped, and a failed transaction write still
//! reports the conversion result to the user — the failure is logged for
//! operators instead.

use tracing::{error, warn};

use crate::currency::{self, FIAT_ANCHOR};
use crate::oracle::PriceOracle;
use crate::services::ledger::{self, NewTransaction};
use crate::services::{convert, menu};
use crate::state::{AppState, PendingIntent};
use crate::telegram::{CallbackAction, CallbackQuery, ChatKind, InlineKeyboardMarkup, Message, Update, UpdateKind};

const MSG_INVALID_AMOUNT: &str = "Geçersiz miktar. Lütfen sayısal bir değer girin.";
const MSG_CONVERT_USAGE: &str = "Doğru format: /convert [miktar] [kaynak para birimi] [hedef para birimi]\n\
                                 Örnek: /convert 100 TRY BTC";
const MSG_UNSUPPORTED_PAIR: &str = "Desteklenmeyen para birimi. Lütfen TRY ve desteklenen kripto paralar \
                                    arasında dönüşüm yapın.";
const MSG_CONVERT_FAILED: &str = "Dönüşüm yapılırken bir hata oluştu. Lütfen daha sonra tekrar deneyin.";
const MSG_PRICES_FAILED: &str = "Fiyatlar alınırken bir hata oluştu. Lütfen daha sonra tekrar deneyin.";

/// Entry point for one inbound update.
pub async fn handle_update(state: &AppState, update: Update) {
    match update.into_kind() {
        UpdateKind::Message(message) => handle_message(state, message).await,
        UpdateKind::Callback(callback) => handle_callback(state, callback).await,
        UpdateKind::Malformed => warn!("malformed update: neither message nor callback, dropped"),
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

async fn handle_message(state: &AppState, message: Message) {
    let chat_id = message.chat.id;
    let is_group = message.chat.kind.is_group();
    let user_id = message.from.map(|u| u.id);

    let Some(raw) = message.text else { return };
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return;
    }

    // 1) A pending intent consumes this message, whatever it says.
    if let Some(intent) = state.intents.take(chat_id).await {
        match parse_amount(&text) {
            Some(amount) => {
                run_conversion(state, chat_id, user_id, amount, &intent.from_currency, &intent.to_currency, is_group)
                    .await;
            }
            None => send(state, chat_id, MSG_INVALID_AMOUNT, None).await,
        }
        return;
    }

    // 2) Groups only honor the inline convert command; everything else is
    //    silently ignored.
    if is_group {
        if text.starts_with("/convert") {
            handle_convert_command(state, chat_id, user_id, &text, is_group).await;
        }
        return;
    }

    // 3) Private command dispatch. Unknown text is ignored.
    match text.as_str() {
        "/start" | "/menu" => {
            let (text, keyboard) = menu::main_menu();
            send(state, chat_id, &text, Some(keyboard)).await;
        }
        "/transactions" => {
            let (text, keyboard) = menu::transactions_link(&state.config.app_url);
            send(state, chat_id, &text, Some(keyboard)).await;
        }
        "/admin" => {
            let (text, keyboard) = menu::admin_link(&state.config.app_url);
            send(state, chat_id, &text, Some(keyboard)).await;
        }
        t if t.starts_with("/convert") => handle_convert_command(state, chat_id, user_id, t, is_group).await,
        _ => {}
    }
}

/// Finite numbers only: NaN and infinities are rejected like any other
/// unparsable input.
fn parse_amount(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `/convert <amount> <from> <to>` — the direct path that bypasses stored
/// state in both private and group chats.
async fn handle_convert_command(state: &AppState, chat_id: i64, user_id: Option<i64>, text: &str, is_group: bool) {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 4 {
        send(state, chat_id, MSG_CONVERT_USAGE, None).await;
        return;
    }
    let Some(amount) = parse_amount(parts[1]) else {
        send(state, chat_id, MSG_INVALID_AMOUNT, None).await;
        return;
    };
    let from = parts[2].to_uppercase();
    let to = parts[3].to_uppercase();
    run_conversion(state, chat_id, user_id, amount, &from, &to, is_group).await;
}

// =============================================================================
// CALLBACKS
// =============================================================================

async fn handle_callback(state: &AppState, callback: CallbackQuery) {
    let user_id = callback.from.map(|u| u.id);
    if let Some(message) = callback.message {
        let chat_id = message.chat.id;
        let is_private = message.chat.kind == ChatKind::Private;
        let action = callback
            .data
            .as_deref()
            .map_or(CallbackAction::Other, CallbackAction::parse);

        match action {
            CallbackAction::Prices => send_price_list(state, chat_id).await,
            CallbackAction::ConvertMenu => {
                let (text, keyboard) = menu::conversion_menu();
                send(state, chat_id, &text, Some(keyboard)).await;
            }
            CallbackAction::Transactions => {
                let (text, keyboard) = menu::transactions_link(&state.config.app_url);
                send(state, chat_id, &text, Some(keyboard)).await;
            }
            CallbackAction::Admin => {
                let (text, keyboard) = menu::admin_link(&state.config.app_url);
                send(state, chat_id, &text, Some(keyboard)).await;
            }
            CallbackAction::MainMenu => {
                let (text, keyboard) = menu::main_menu();
                send(state, chat_id, &text, Some(keyboard)).await;
            }
            CallbackAction::FiatToAsset(asset) => {
                select_direction(state, chat_id, FIAT_ANCHOR.to_string(), asset, is_private).await;
            }
            CallbackAction::AssetToFiat(asset) => {
                select_direction(state, chat_id, asset, FIAT_ANCHOR.to_string(), is_private).await;
            }
            CallbackAction::Other => {}
        }
    } else {
        warn!(callback_id = %callback.id, user_id, "callback without a message, nothing to do");
    }

    // Exactly one acknowledgment per callback update, whatever happened above.
    if let Err(e) = state.transport.answer_callback(&callback.id).await {
        warn!(error = %e, callback_id = %callback.id, "callback acknowledgment failed");
    }
}

/// A conversion direction was picked from the menu. Private chats enter the
/// awaiting-amount state; groups are told the inline command instead and
/// never enter it.
async fn select_direction(state: &AppState, chat_id: i64, from: String, to: String, is_private: bool) {
    if is_private {
        let prompt = if to == FIAT_ANCHOR {
            format!("Lütfen TL'ye dönüştürmek istediğiniz {from} miktarını girin:")
        } else {
            format!("Lütfen {to}'a dönüştürmek istediğiniz TL miktarını girin:")
        };
        state
            .intents
            .set(chat_id, PendingIntent { from_currency: from, to_currency: to })
            .await;
        send(state, chat_id, &prompt, None).await;
    } else {
        let text = format!(
            "Lütfen dönüştürmek istediğiniz {from} miktarını girin.\n\nÖrnek: /convert 100 {from} {to}"
        );
        send(state, chat_id, &text, None).await;
    }
}

async fn send_price_list(state: &AppState, chat_id: i64) {
    match state.oracle.quote(currency::SUPPORTED_ASSETS).await {
        Ok(quote) => {
            let (text, keyboard) = menu::price_list(&quote, chrono::Utc::now());
            send(state, chat_id, &text, Some(keyboard)).await;
        }
        Err(e) => {
            warn!(error = %e, chat_id, "price list fetch failed");
            send(state, chat_id, MSG_PRICES_FAILED, None).await;
        }
    }
}

// =============================================================================
// CONVERSION PIPELINE
// =============================================================================

async fn run_conversion(
    state: &AppState,
    chat_id: i64,
    user_id: Option<i64>,
    amount: f64,
    from: &str,
    to: &str,
    is_group: bool,
) {
    match convert::execute(state.oracle.as_ref(), amount, from, to).await {
        Ok(conversion) => {
            let mut text = result_text(from, to, conversion.from_amount, conversion.to_amount);
            // Private chats get the TRY-TRX discount table for the fiat side.
            if !is_group {
                text.push_str(&breakdown_text(state.oracle.as_ref(), conversion.fiat_amount).await);
            }

            record_conversion(state, chat_id, user_id, conversion, from, to).await;

            let keyboard = (!is_group).then(menu::after_conversion_keyboard);
            send(state, chat_id, &text, keyboard).await;
        }
        Err(convert::ConvertError::UnsupportedPair { .. } | convert::ConvertError::UnsupportedCurrency(_)) => {
            send(state, chat_id, MSG_UNSUPPORTED_PAIR, None).await;
        }
        Err(e @ (convert::ConvertError::PriceUnavailable(_) | convert::ConvertError::Oracle(_))) => {
            warn!(error = %e, chat_id, from, to, "conversion failed");
            send(state, chat_id, MSG_CONVERT_FAILED, None).await;
        }
    }
}

fn result_text(from: &str, to: &str, from_amount: f64, to_amount: f64) -> String {
    if from == FIAT_ANCHOR {
        format!(
            "💱 *Dönüşüm Sonucu*\n\n{} ₺ = {} {to}",
            menu::fmt_amount(from_amount),
            menu::fmt_amount(to_amount)
        )
    } else {
        format!(
            "💱 *Dönüşüm Sonucu*\n\n{} {from} = {} ₺",
            menu::fmt_amount(from_amount),
            menu::fmt_amount(to_amount)
        )
    }
}

/// TRY-TRX discount table appended to private-chat conversion replies. A
/// breakdown failure degrades to a fallback line; it never fails the
/// conversion itself.
async fn breakdown_text(oracle: &dyn PriceOracle, fiat_amount: f64) -> String {
    match oracle.quote(&["TRX"]).await {
        Ok(quote) => match quote.price("TRX") {
            Some(price) => {
                let mut text = "\n\n*TRY-TRX Dönüşüm Oranları:*\n".to_string();
                for row in convert::percentage_breakdown(fiat_amount, price) {
                    text.push_str(&format!(
                        "%{} TRY: {:.1}, TRX: {:.2}\n",
                        row.percent, row.discounted_fiat, row.asset_amount
                    ));
                }
                text
            }
            None => "\n\nTRX fiyatı alınamadı.".to_string(),
        },
        Err(e) => {
            warn!(error = %e, "breakdown price fetch failed");
            "\n\nYüzdelik oranlar hesaplanamadı.".to_string()
        }
    }
}

/// Record a completed conversion. Synchronous in the request path so write
/// failures are observable; the reply is sent regardless.
async fn record_conversion(
    state: &AppState,
    chat_id: i64,
    user_id: Option<i64>,
    conversion: convert::Conversion,
    from: &str,
    to: &str,
) {
    let Some(user_id) = user_id else { return };
    if !currency::is_supported_asset(from) && !currency::is_supported_asset(to) {
        return;
    }

    let new = NewTransaction {
        user_id,
        from_currency: from.to_string(),
        to_currency: to.to_string(),
        from_amount: conversion.from_amount,
        to_amount: conversion.to_amount,
    };
    if let Err(e) = ledger::record(state.store.as_ref(), new).await {
        error!(error = %e, chat_id, user_id, "transaction record failed");
    }
}

async fn send(state: &AppState, chat_id: i64, text: &str, keyboard: Option<InlineKeyboardMarkup>) {
    if let Err(e) = state.transport.send_message(chat_id, text, keyboard).await {
        warn!(error = %e, chat_id, "message send failed");
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
