//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the Telegram webhook and the read-only JSON API under a single Axum
//! router. The webhook is the only write path; `/api/*` serves the dashboard
//! pages, so it gets a permissive CORS layer.

pub mod analytics;
pub mod transactions;
pub mod webhook;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[must_use]
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/webhook", post(webhook::receive))
        .route("/api/transactions", get(transactions::list))
        .route("/api/analytics", get(analytics::report))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
