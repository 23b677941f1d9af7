//! In-memory implementation of the Ledger trait.
//!
//! This is primarily for testing. It has the same observable semantics as
//! the SQLite backend but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use statemap_core::{KeyValue, KeyVersion};

use crate::error::{LedgerError, Result};
use crate::traits::{EmittedEvent, Ledger};

/// In-memory ledger implementation.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock.
/// Tests use [`MemoryLedger::set_invoker`] to impersonate principals and
/// [`MemoryLedger::events`] to observe emitted notifications.
pub struct MemoryLedger {
    inner: RwLock<MemoryLedgerInner>,
}

struct MemoryLedgerInner {
    /// Current state, in native (lexicographic) key order.
    state: BTreeMap<String, Bytes>,

    /// Append-only version history per key.
    history: HashMap<String, Vec<KeyVersion>>,

    /// Events recorded by `emit_event`.
    events: Vec<EmittedEvent>,

    /// Identity returned for the current invoker, if set.
    invoker: Option<Bytes>,

    /// Monotonic counter for synthetic transaction ids.
    tx_counter: u64,
}

impl MemoryLedger {
    /// Create a new empty ledger with no invoker identity.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryLedgerInner {
                state: BTreeMap::new(),
                history: HashMap::new(),
                events: Vec::new(),
                invoker: None,
                tx_counter: 0,
            }),
        }
    }

    /// Create a ledger whose invoker identity is already set.
    pub fn with_invoker(identity: impl Into<Bytes>) -> Self {
        let ledger = Self::new();
        ledger.set_invoker(identity);
        ledger
    }

    /// Set the identity reported for subsequent invocations.
    pub fn set_invoker(&self, identity: impl Into<Bytes>) {
        let mut inner = self.inner.write().unwrap();
        inner.invoker = Some(identity.into());
    }

    /// Clear the invoker identity, making resolution fail.
    pub fn clear_invoker(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.invoker = None;
    }

    /// All events emitted so far, in emission order.
    pub fn events(&self) -> Vec<EmittedEvent> {
        let inner = self.inner.read().unwrap();
        inner.events.clone()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerInner {
    fn next_tx_id(&mut self) -> String {
        self.tx_counter += 1;
        format!("tx{:08}", self.tx_counter)
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.state.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let tx_id = inner.next_tx_id();
        inner.state.insert(key.to_string(), value.clone());
        inner
            .history
            .entry(key.to_string())
            .or_default()
            .push(KeyVersion::write(tx_id, value, now_millis()));
        Ok(())
    }

    async fn delete_state(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let tx_id = inner.next_tx_id();
        inner.state.remove(key);
        inner
            .history
            .entry(key.to_string())
            .or_default()
            .push(KeyVersion::tombstone(tx_id, now_millis()));
        Ok(())
    }

    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        let inner = self.inner.read().unwrap();

        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        Ok(inner
            .state
            .range::<String, _>((lower, upper))
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: v.clone(),
            })
            .collect())
    }

    async fn rich_query(&self, expr: &str) -> Result<Vec<KeyValue>> {
        // This backend's query language: a plain key prefix.
        let inner = self.inner.read().unwrap();
        Ok(inner
            .state
            .range::<String, _>((Bound::Included(expr.to_string()), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(expr))
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: v.clone(),
            })
            .collect())
    }

    async fn history_scan(&self, key: &str) -> Result<Vec<KeyVersion>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.history.get(key).cloned().unwrap_or_default())
    }

    async fn emit_event(&self, name: &str, payload: Bytes) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.events.push(EmittedEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }

    async fn invoker_identity(&self) -> Result<Bytes> {
        let inner = self.inner.read().unwrap();
        inner.invoker.clone().ok_or(LedgerError::IdentityUnavailable)
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
