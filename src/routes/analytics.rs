//! Usage aggregation endpoint for the admin dashboard.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::services::analytics::{self, GlobalStats, UserSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub stats: GlobalStats,
    pub users: Vec<UserSummary>,
}

/// `GET /api/analytics` — global stats plus one summary per user, first-seen
/// order. Computed from the full history on every request; history volumes
/// are small enough that caching would be premature.
pub async fn report(State(state): State<AppState>) -> Result<Json<AnalyticsResponse>, StatusCode> {
    match state.store.list_all().await {
        Ok(transactions) => Ok(Json(AnalyticsResponse {
            stats: analytics::global_stats(&transactions),
            users: analytics::summarize(&transactions),
        })),
        Err(e) => {
            error!(error = %e, "analytics aggregation failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
