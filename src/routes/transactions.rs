//! Transaction history endpoint for the dashboard pages.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::error;

use crate::services::ledger::Transaction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

/// `GET /api/transactions[?userId=..]` — newest first, optionally filtered to
/// one user.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Transaction>>, StatusCode> {
    let result = match query.user_id {
        Some(user_id) => state.store.list_for_user(user_id).await,
        None => state.store.list_all().await,
    };
    match result {
        Ok(transactions) => Ok(Json(transactions)),
        Err(e) => {
            error!(error = %e, user_id = query.user_id, "transaction listing failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "transactions_test.rs"]
mod tests;
