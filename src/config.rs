//! Bot configuration parsed from environment variables.

pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_ORACLE_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing env var: {0}")]
    MissingVar(&'static str),
}

/// Timeouts applied to outbound HTTP clients (Telegram, price oracle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Telegram bot API token.
    pub bot_token: String,
    /// Public base URL of this deployment, used in link replies.
    pub app_url: String,
    /// Price oracle API base URL.
    pub oracle_base_url: String,
    pub timeouts: HttpTimeouts,
}

impl BotConfig {
    /// Build typed bot config from environment variables.
    ///
    /// Required:
    /// - `TELEGRAM_BOT_TOKEN`
    ///
    /// Optional:
    /// - `APP_URL`: default `http://localhost:3000`
    /// - `ORACLE_BASE_URL`: default CoinGecko v3 API
    /// - `HTTP_REQUEST_TIMEOUT_SECS`: default 30
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `TELEGRAM_BOT_TOKEN` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| ConfigError::MissingVar("TELEGRAM_BOT_TOKEN"))?;
        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| DEFAULT_APP_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let oracle_base_url = std::env::var("ORACLE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ORACLE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = HttpTimeouts {
            request_secs: env_parse("HTTP_REQUEST_TIMEOUT_SECS", DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { bot_token, app_url, oracle_base_url, timeouts })
    }
}

pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
