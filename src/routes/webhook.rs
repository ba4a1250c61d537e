//! Telegram webhook endpoint.
//!
//! Always answers `{"ok": true}`: Telegram retries deliveries on non-2xx
//! responses, and a payload this service cannot decode will not decode better
//! on the retry. Undecodable payloads are logged and dropped instead.

use axum::Json;
use axum::extract::State;
use serde_json::json;
use tracing::warn;

use crate::services::router;
use crate::state::AppState;
use crate::telegram::Update;

pub async fn receive(State(state): State<AppState>, Json(payload): Json<serde_json::Value>) -> Json<serde_json::Value> {
    match serde_json::from_value::<Update>(payload) {
        Ok(update) => router::handle_update(&state, update).await,
        Err(e) => warn!(error = %e, "undecodable webhook payload, dropped"),
    }
    Json(json!({ "ok": true }))
}

#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;
