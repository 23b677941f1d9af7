//! Ledger trait: the abstract interface to the state substrate.
//!
//! The engine delegates all durable state to an external append-only ledger.
//! This trait is the full surface it consumes: keyed state access, range and
//! rich-query scans, per-key history, composite-key derivation, event
//! emission, and invoker identity resolution.

use async_trait::async_trait;
use bytes::Bytes;

use statemap_core::{KeyValue, KeyVersion};

use crate::error::{LedgerError, Result};

/// Delimiter used in composite keys (the minimum Unicode scalar).
const COMPOSITE_DELIMITER: char = '\u{0}';

/// A notification attached to an invocation's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    /// Event name; the engine tags events with the affected key.
    pub name: String,
    /// Opaque payload for subscribers.
    pub payload: Bytes,
}

/// The Ledger trait: async interface to the state substrate.
///
/// All methods are async so backends may block (SQLite via `spawn_blocking`)
/// or go over the network. Conflict serialization between concurrent
/// invocations is the substrate's job, not the caller's; this layer performs
/// no locking of its own beyond what an individual backend needs.
///
/// # Design Notes
///
/// - **Absence vs. empty**: `get_state` distinguishes an absent key
///   (`None`) from an empty value (`Some` of empty bytes); callers may
///   collapse the two.
/// - **Range bounds**: `range_scan` covers `[start, end)` in the substrate's
///   native lexicographic byte order; an empty bound is unbounded on that
///   side.
/// - **Rich queries**: the expression is opaque to the caller. The bundled
///   backends interpret it as a key prefix; real substrates define their own
///   query language.
#[async_trait]
pub trait Ledger: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // State Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the current value of a key, or `None` if absent.
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write or overwrite a key.
    async fn put_state(&self, key: &str, value: Bytes) -> Result<()>;

    /// Delete a key. Deleting an absent key succeeds.
    async fn delete_state(&self, key: &str) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Scan Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Scan `[start, end)` in native key order. Empty bounds are unbounded.
    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<KeyValue>>;

    /// Evaluate an opaque query expression against current state.
    async fn rich_query(&self, expr: &str) -> Result<Vec<KeyValue>>;

    /// All past versions of a key, oldest first.
    async fn history_scan(&self, key: &str) -> Result<Vec<KeyVersion>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Invocation Context
    // ─────────────────────────────────────────────────────────────────────────

    /// Derive a composite namespace key from an index name and parts.
    fn composite_key(&self, index: &str, parts: &[&str]) -> Result<String> {
        composite_key(index, parts)
    }

    /// Emit a notification for external subscribers.
    ///
    /// A rejection is surfaced as an error; the caller decides whether that
    /// is fatal for the operation (the engine treats it as fatal).
    async fn emit_event(&self, name: &str, payload: Bytes) -> Result<()>;

    /// The raw identity bytes of the current invoker.
    async fn invoker_identity(&self) -> Result<Bytes>;
}

/// Derive a composite key: `U+0000 || index || U+0000 || part || U+0000 ...`.
///
/// The leading delimiter keeps the composite-index namespace disjoint from
/// ordinary keys (it sorts before every printable key), and the format
/// matches what external readers of the namespace expect.
pub fn composite_key(index: &str, parts: &[&str]) -> Result<String> {
    for piece in std::iter::once(&index).chain(parts.iter()) {
        if piece.contains(COMPOSITE_DELIMITER) {
            return Err(LedgerError::InvalidKey(format!(
                "composite key part contains U+0000: {:?}",
                piece
            )));
        }
    }

    let mut key = String::with_capacity(index.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>() + 2);
    key.push(COMPOSITE_DELIMITER);
    key.push_str(index);
    key.push(COMPOSITE_DELIMITER);
    for part in parts {
        key.push_str(part);
        key.push(COMPOSITE_DELIMITER);
    }
    Ok(key)
}

/// The exclusive upper bound for scanning every entry of one composite index.
pub fn composite_index_range(index: &str) -> Result<(String, String)> {
    let start = composite_key(index, &[])?;
    // U+0001 right after the trailing delimiter bounds the index namespace.
    let mut end = String::with_capacity(start.len());
    end.push(COMPOSITE_DELIMITER);
    end.push_str(index);
    end.push('\u{1}');
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key_format() {
        let key = composite_key("compositeKeyTest", &["mykey"]).unwrap();
        assert_eq!(key, "\u{0}compositeKeyTest\u{0}mykey\u{0}");
    }

    #[test]
    fn test_composite_key_sorts_before_plain_keys() {
        let key = composite_key("idx", &["a"]).unwrap();
        assert!(key.as_str() < "a");
        assert!(key.as_str() < "0");
    }

    #[test]
    fn test_composite_key_rejects_embedded_delimiter() {
        assert!(composite_key("idx", &["bad\u{0}part"]).is_err());
        assert!(composite_key("bad\u{0}idx", &["part"]).is_err());
    }

    #[test]
    fn test_composite_index_range_brackets_entries() {
        let (start, end) = composite_index_range("idx").unwrap();
        let entry = composite_key("idx", &["k"]).unwrap();
        assert!(start.as_str() <= entry.as_str());
        assert!(entry.as_str() < end.as_str());
        // An entry of a different index falls outside.
        let other = composite_key("idy", &["k"]).unwrap();
        assert!(!(start.as_str() <= other.as_str() && other.as_str() < end.as_str()));
    }
}
