//! Record types produced by substrate scans.
//!
//! These are consumed verbatim from the ledger; the engine never mutates
//! them, only renders them.

use bytes::Bytes;

/// A key together with its current value, as returned by range scans and
/// rich queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Bytes,
}

/// One past version of a key, as returned by a history scan.
///
/// Ordered oldest-first by the substrate. A delete shows up as a tombstone
/// with `value: None` and `is_delete: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVersion {
    /// The transaction that produced this version.
    pub tx_id: String,
    /// The value written, or `None` for a tombstone.
    pub value: Option<Bytes>,
    /// Substrate timestamp, Unix milliseconds.
    pub timestamp_ms: i64,
    /// Whether this version is a delete.
    pub is_delete: bool,
}

impl KeyVersion {
    /// A written version.
    pub fn write(tx_id: impl Into<String>, value: Bytes, timestamp_ms: i64) -> Self {
        Self {
            tx_id: tx_id.into(),
            value: Some(value),
            timestamp_ms,
            is_delete: false,
        }
    }

    /// A tombstone version.
    pub fn tombstone(tx_id: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            tx_id: tx_id.into(),
            value: None,
            timestamp_ms,
            is_delete: true,
        }
    }
}
