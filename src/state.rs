//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! carries the external collaborators as trait objects (store, transport,
//! oracle) plus the process-wide [`IntentStore`] of pending conversion
//! intents. Intents are short-lived: set when a private chat picks a
//! conversion direction, consumed by that chat's next text message, gone on
//! restart.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::BotConfig;
use crate::oracle::PriceOracle;
use crate::services::ledger::TransactionStore;
use crate::telegram::ChatTransport;

// =============================================================================
// PENDING INTENT
// =============================================================================

/// "The next numeric message from this chat is an amount to convert between
/// these two currencies."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingIntent {
    pub from_currency: String,
    pub to_currency: String,
}

/// Conversation state table keyed by chat id. At most one pending intent per
/// chat; concurrent writes for the same chat resolve last-write-wins — the
/// expected update volume is low and per-chat serialization is deliberately
/// not attempted.
#[derive(Clone, Default)]
pub struct IntentStore {
    inner: Arc<RwLock<HashMap<i64, PendingIntent>>>,
}

impl IntentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending intent for `chat_id`.
    pub async fn set(&self, chat_id: i64, intent: PendingIntent) {
        self.inner.write().await.insert(chat_id, intent);
    }

    /// Consume the pending intent for `chat_id`, if any. Read and clear happen
    /// under one lock, so an intent is answered at most once.
    pub async fn take(&self, chat_id: i64) -> Option<PendingIntent> {
        self.inner.write().await.remove(&chat_id)
    }

    /// Peek without consuming.
    pub async fn get(&self, chat_id: i64) -> Option<PendingIntent> {
        self.inner.read().await.get(&chat_id).cloned()
    }

    /// Drop the pending intent for `chat_id`, if any.
    pub async fn clear(&self, chat_id: i64) {
        self.inner.write().await.remove(&chat_id);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub transport: Arc<dyn ChatTransport>,
    pub oracle: Arc<dyn PriceOracle>,
    pub intents: IntentStore,
    pub config: Arc<BotConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn TransactionStore>,
        transport: Arc<dyn ChatTransport>,
        oracle: Arc<dyn PriceOracle>,
        config: BotConfig,
    ) -> Self {
        Self { store, transport, oracle, intents: IntentStore::new(), config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    fn intent(from: &str, to: &str) -> PendingIntent {
        PendingIntent { from_currency: from.into(), to_currency: to.into() }
    }

    #[tokio::test]
    async fn take_consumes_exactly_once() {
        let store = IntentStore::new();
        store.set(42, intent("BTC", "TRY")).await;

        assert_eq!(store.take(42).await, Some(intent("BTC", "TRY")));
        assert_eq!(store.take(42).await, None);
    }

    #[tokio::test]
    async fn set_is_last_write_wins() {
        let store = IntentStore::new();
        store.set(42, intent("BTC", "TRY")).await;
        store.set(42, intent("TRY", "DOGE")).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.take(42).await, Some(intent("TRY", "DOGE")));
    }

    #[tokio::test]
    async fn chats_are_independent() {
        let store = IntentStore::new();
        store.set(1, intent("BTC", "TRY")).await;
        store.set(2, intent("TRY", "XMR")).await;

        store.clear(1).await;
        assert_eq!(store.get(1).await, None);
        assert_eq!(store.get(2).await, Some(intent("TRY", "XMR")));
    }
}
