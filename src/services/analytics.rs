//! Analytics aggregator — per-user summaries and global statistics.
//!
//! DESIGN
//! ======
//! Both aggregations are single-pass folds over the full transaction set,
//! recomputed on every request and never persisted. User summaries come out
//! in first-seen order; the popular-currency tie-break goes to the symbol
//! that reached the maximum count first.

use std::collections::BTreeSet;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::currency::FIAT_ANCHOR;
use crate::services::ledger::Transaction;

/// Derived per-user view of the transaction history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: i64,
    pub total_transactions: u64,
    /// Every symbol the user touched, either side of a conversion.
    pub currencies: BTreeSet<String>,
    /// Sum of the fiat-anchor side of each transaction.
    pub total_fiat_volume: f64,
    pub last_active: DateTime<Utc>,
}

/// Derived totals across all users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_transactions: u64,
    pub unique_users: u64,
    pub total_fiat_volume: f64,
    /// Symbol with the highest combined from/to occurrence count, or `None`
    /// with no transactions.
    pub most_popular_currency: Option<String>,
}

/// Amount on the fiat-anchor side of a transaction, zero if neither side is
/// the anchor (cannot occur for recorded transactions; the recorder enforces
/// the pair invariant).
fn fiat_side(txn: &Transaction) -> f64 {
    if txn.from_currency == FIAT_ANCHOR {
        txn.from_amount
    } else if txn.to_currency == FIAT_ANCHOR {
        txn.to_amount
    } else {
        0.0
    }
}

/// Fold the transaction set into one summary per user, in first-seen order.
#[must_use]
pub fn summarize(transactions: &[Transaction]) -> Vec<UserSummary> {
    let mut summaries: Vec<UserSummary> = Vec::new();
    let mut index_by_user: HashMap<i64, usize> = HashMap::new();

    for txn in transactions {
        let idx = *index_by_user.entry(txn.user_id).or_insert_with(|| {
            summaries.push(UserSummary {
                user_id: txn.user_id,
                total_transactions: 0,
                currencies: BTreeSet::new(),
                total_fiat_volume: 0.0,
                last_active: txn.timestamp,
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[idx];
        summary.total_transactions += 1;
        summary.currencies.insert(txn.from_currency.clone());
        summary.currencies.insert(txn.to_currency.clone());
        summary.total_fiat_volume += fiat_side(txn);
        // Strictly later only: timestamp ties keep the earlier-seen value.
        if txn.timestamp > summary.last_active {
            summary.last_active = txn.timestamp;
        }
    }

    summaries
}

/// Totals across the whole transaction set.
#[must_use]
pub fn global_stats(transactions: &[Transaction]) -> GlobalStats {
    let mut users: BTreeSet<i64> = BTreeSet::new();
    let mut total_fiat_volume = 0.0;
    // Occurrence counts in first-seen symbol order for the tie-break.
    let mut symbol_counts: Vec<(String, u64)> = Vec::new();

    let mut bump = |counts: &mut Vec<(String, u64)>, symbol: &str| {
        if let Some(entry) = counts.iter_mut().find(|(s, _)| s == symbol) {
            entry.1 += 1;
        } else {
            counts.push((symbol.to_string(), 1));
        }
    };

    for txn in transactions {
        users.insert(txn.user_id);
        total_fiat_volume += fiat_side(txn);
        bump(&mut symbol_counts, &txn.from_currency);
        bump(&mut symbol_counts, &txn.to_currency);
    }

    // Strictly-greater comparison: the first symbol to reach the maximum
    // count wins ties.
    let mut most_popular_currency = None;
    let mut max_count = 0;
    for (symbol, count) in &symbol_counts {
        if *count > max_count {
            max_count = *count;
            most_popular_currency = Some(symbol.clone());
        }
    }

    GlobalStats {
        total_transactions: transactions.len() as u64,
        unique_users: users.len() as u64,
        total_fiat_volume,
        most_popular_currency,
    }
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
