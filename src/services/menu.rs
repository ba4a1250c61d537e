//! Menus and canned replies — keyboards, link replies, price list rendering.
//!
//! Pure builders: every function returns text (and usually a keyboard) for
//! the router to send, so rendering is testable without a transport.

use chrono::{DateTime, Utc};

use crate::currency::{FIAT_ANCHOR, SUPPORTED_ASSETS};
use crate::oracle::PriceQuote;
use crate::telegram::types::{asset_to_fiat_data, direction_label, fiat_to_asset_data};
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Format an amount with up to 8 fraction digits, trailing zeros trimmed.
#[must_use]
pub fn fmt_amount(value: f64) -> String {
    let fixed = format!("{value:.8}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }
}

fn main_menu_button() -> InlineKeyboardButton {
    InlineKeyboardButton::callback("⬅️ Ana Menü", "main_menu")
}

/// Main menu: greeting plus the four entry points.
#[must_use]
pub fn main_menu() -> (String, InlineKeyboardMarkup) {
    let text = "🤖 *KurBot*\n\nMerhaba! Kripto para fiyatlarını görmek veya dönüşüm yapmak için \
                aşağıdaki menüyü kullanabilirsiniz."
        .to_string();
    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::callback("💰 Güncel Fiyatlar", "prices")],
            vec![InlineKeyboardButton::callback("🔄 Para Çevirici", "convert_menu")],
            vec![InlineKeyboardButton::callback("📊 İşlem Geçmişi", "transactions")],
            vec![InlineKeyboardButton::callback("👑 Admin Paneli", "admin")],
        ],
    };
    (text, keyboard)
}

/// Conversion menu: one row per supported asset, both directions.
#[must_use]
pub fn conversion_menu() -> (String, InlineKeyboardMarkup) {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = SUPPORTED_ASSETS
        .iter()
        .map(|asset| {
            vec![
                InlineKeyboardButton::callback(direction_label(FIAT_ANCHOR, asset), fiat_to_asset_data(asset)),
                InlineKeyboardButton::callback(direction_label(asset, FIAT_ANCHOR), asset_to_fiat_data(asset)),
            ]
        })
        .collect();
    rows.push(vec![main_menu_button()]);

    let text = "🔄 *Para Çevirici*\n\nLütfen yapmak istediğiniz dönüşüm işlemini seçin:".to_string();
    (text, InlineKeyboardMarkup { inline_keyboard: rows })
}

/// Link reply pointing at the transaction history page.
#[must_use]
pub fn transactions_link(app_url: &str) -> (String, InlineKeyboardMarkup) {
    let url = format!("{app_url}/transactions");
    let text = format!(
        "📊 *İşlem Geçmişi*\n\nTüm dönüşüm işlemlerinizi görmek için aşağıdaki bağlantıyı \
         kullanabilirsiniz:\n\n{url}"
    );
    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::link("🔍 İşlem Geçmişini Görüntüle", url)],
            vec![main_menu_button()],
        ],
    };
    (text, keyboard)
}

/// Link reply pointing at the admin dashboard.
#[must_use]
pub fn admin_link(app_url: &str) -> (String, InlineKeyboardMarkup) {
    let url = format!("{app_url}/admin");
    let text = format!(
        "👑 *Admin Paneli*\n\nKullanıcı işlemlerini yönetmek için admin paneline \
         erişebilirsiniz:\n\n{url}"
    );
    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::link("👑 Admin Paneline Git", url)],
            vec![main_menu_button()],
        ],
    };
    (text, keyboard)
}

/// Keyboard offered after a successful private-chat conversion.
#[must_use]
pub fn after_conversion_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::callback("🔄 Başka Bir Dönüşüm", "convert_menu")],
            vec![InlineKeyboardButton::callback("📊 İşlem Geçmişi", "transactions")],
            vec![main_menu_button()],
        ],
    }
}

/// Current prices, one line per asset the quote could price, with a
/// last-updated footer. `now` is injected so rendering stays deterministic in
/// tests; Istanbul has been fixed at UTC+3 since 2016.
#[must_use]
pub fn price_list(quote: &PriceQuote, now: DateTime<Utc>) -> (String, InlineKeyboardMarkup) {
    let mut text = "💰 *Güncel Kripto Para Fiyatları (TL)*\n\n".to_string();
    for asset in SUPPORTED_ASSETS {
        if let Some(price) = quote.price(asset) {
            text.push_str(&format!("*{asset}*: {} ₺\n", fmt_amount(price)));
        }
    }
    let istanbul = now + chrono::Duration::hours(3);
    text.push_str(&format!("\n_Son güncelleme: {}_", istanbul.format("%d.%m.%Y %H:%M:%S")));

    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::callback("🔄 Yenile", "prices")],
            vec![main_menu_button()],
        ],
    };
    (text, keyboard)
}

#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;
