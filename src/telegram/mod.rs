//! Chat transport — Telegram Bot API client behind a mockable trait.
//!
//! DESIGN
//! ======
//! The router only sees [`ChatTransport`]: send a message (optionally with an
//! inline keyboard) and acknowledge a callback. The production implementation
//! posts JSON to `api.telegram.org` with Markdown parse mode. Transport
//! failures are surfaced as errors for the caller to log; they are never
//! retried here.

pub mod types;

use std::time::Duration;

use serde::Serialize;

use crate::config::HttpTimeouts;
pub use types::{
    CallbackAction, CallbackQuery, Chat, ChatKind, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update,
    UpdateKind, User,
};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Errors produced by chat transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The HTTP request to the Bot API failed.
    #[error("transport request failed: {0}")]
    Request(String),

    /// The Bot API returned a non-success HTTP status.
    #[error("Telegram API error: status {status}")]
    Api { status: u16, body: String },
}

/// Async trait for outbound chat calls. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a Markdown-formatted message, optionally with an inline keyboard.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the send fails.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TransportError>;

    /// Acknowledge a callback query to clear the button's loading indicator.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the acknowledgment fails.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}

// =============================================================================
// BOT API CLIENT
// =============================================================================

pub struct TelegramClient {
    http: reqwest::Client,
    /// `{base}/bot{token}`; method names are appended per call.
    bot_url: String,
}

impl TelegramClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(bot_token: &str, timeouts: HttpTimeouts) -> Result<Self, TransportError> {
        Self::with_base_url(TELEGRAM_API_BASE, bot_token, timeouts)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_base_url(base_url: &str, bot_token: &str, timeouts: HttpTimeouts) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        let bot_url = format!("{}/bot{bot_token}", base_url.trim_end_matches('/'));
        Ok(Self { http, bot_url })
    }

    async fn post_json(&self, method: &str, body: &impl Serialize) -> Result<(), TransportError> {
        let url = format!("{}/{method}", self.bot_url);
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            return Err(TransportError::Api { status, body });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct AnswerCallbackBody<'a> {
    callback_query_id: &'a str,
}

#[async_trait::async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let body = SendMessageBody { chat_id, text, parse_mode: "Markdown", reply_markup: keyboard };
        self.post_json("sendMessage", &body).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        let body = AnswerCallbackBody { callback_query_id: callback_id };
        self.post_json("answerCallbackQuery", &body).await
    }
}
