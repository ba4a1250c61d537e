//! Transaction recorder — append-only conversion history.
//!
//! DESIGN
//! ======
//! The persistence store is an external collaborator behind the
//! [`TransactionStore`] trait (production: Postgres via sqlx). The recorder
//! validates the currency-pair invariant before any insert: exactly one side
//! of a transaction is the fiat anchor and the other a supported asset, or
//! the record is never created. Records are immutable once stored; the core
//! only ever appends and reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::currency;

// =============================================================================
// TYPES
// =============================================================================

/// A completed conversion. Serialized camelCase with an RFC 3339 timestamp,
/// matching the shape the dashboard consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: i64,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: f64,
    pub to_amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// A conversion about to be recorded; id and timestamp are store-generated.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: f64,
    pub to_amount: f64,
}

/// Errors produced by the recorder.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The pair is not fiat-anchor ↔ supported-asset in either direction.
    #[error("invalid currency pair: {from} -> {to}")]
    InvalidPair { from: String, to: String },

    #[error("store error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Async trait over the durable transaction store. Enables in-memory mocking.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    /// Append one record; returns the stored row with generated id and
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the write fails.
    async fn insert(&self, new: &NewTransaction) -> Result<Transaction, LedgerError>;

    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the read fails.
    async fn list_all(&self) -> Result<Vec<Transaction>, LedgerError>;

    /// One user's records, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the read fails.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>, LedgerError>;
}

// =============================================================================
// RECORDER OPERATIONS
// =============================================================================

/// Validate the pair invariant and append the record.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidPair`] for pairs outside the
/// fiat-anchor ↔ supported-asset form, or a store error if the write fails.
pub async fn record(store: &dyn TransactionStore, new: NewTransaction) -> Result<Transaction, LedgerError> {
    if currency::classify_pair(&new.from_currency, &new.to_currency).is_none() {
        return Err(LedgerError::InvalidPair { from: new.from_currency, to: new.to_currency });
    }
    store.insert(&new).await
}

// =============================================================================
// POSTGRES STORE
// =============================================================================

pub struct PgTransactionStore {
    pool: PgPool,
}

impl PgTransactionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_transaction(row: &PgRow) -> Result<Transaction, sqlx::Error> {
    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        from_currency: row.try_get("from_currency")?,
        to_currency: row.try_get("to_currency")?,
        from_amount: row.try_get("from_amount")?,
        to_amount: row.try_get("to_amount")?,
        timestamp: row.try_get("created_at")?,
    })
}

const TRANSACTION_COLUMNS: &str = "id, user_id, from_currency, to_currency, from_amount, to_amount, created_at";

#[async_trait::async_trait]
impl TransactionStore for PgTransactionStore {
    async fn insert(&self, new: &NewTransaction) -> Result<Transaction, LedgerError> {
        let row = sqlx::query(
            "INSERT INTO transactions (user_id, from_currency, to_currency, from_amount, to_amount)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, from_currency, to_currency, from_amount, to_amount, created_at",
        )
        .bind(new.user_id)
        .bind(&new.from_currency)
        .bind(&new.to_currency)
        .bind(new.from_amount)
        .bind(new.to_amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_transaction(&row)?)
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(row_to_transaction)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>, LedgerError> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(row_to_transaction)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
