//! Read-only query execution and JSON result rendering.
//!
//! All results are serialized with serde_json. History rendering in
//! particular never splices raw value bytes into the output: a stored value
//! that parses as JSON is embedded structurally, anything else becomes an
//! escaped JSON string, so the rendered array is always well-formed.

use std::time::Duration;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use serde::Serialize;

use statemap_core::KeyVersion;
use statemap_ledger::Ledger;

use crate::error::Result;

/// List keys in `[start, end)` in the substrate's native order.
///
/// A positive `delay_ms` pauses that long before consuming each element.
/// The pause exists to probe caller timeout behavior under slow iteration
/// and is cancelable the same way any other await point is.
pub async fn list_keys<L: Ledger>(
    ledger: &L,
    start: &str,
    end: &str,
    delay_ms: u64,
) -> Result<Bytes> {
    let entries = ledger.range_scan(start, end).await?;

    let mut keys = Vec::with_capacity(entries.len());
    for entry in entries {
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        keys.push(entry.key);
    }

    tracing::debug!(count = keys.len(), "range listing complete");
    to_json(&keys)
}

/// Evaluate an opaque query expression; the result is the matching keys.
pub async fn rich_query_keys<L: Ledger>(ledger: &L, expr: &str) -> Result<Bytes> {
    let entries = ledger.rich_query(expr).await?;
    let keys: Vec<String> = entries.into_iter().map(|kv| kv.key).collect();
    to_json(&keys)
}

/// Transaction ids of every past version of `key`, oldest first.
pub async fn history_tx_ids<L: Ledger>(ledger: &L, key: &str) -> Result<Bytes> {
    let versions = ledger.history_scan(key).await?;
    let tx_ids: Vec<String> = versions.into_iter().map(|v| v.tx_id).collect();
    to_json(&tx_ids)
}

/// Full version records of `key`, oldest first.
pub async fn history_records<L: Ledger>(ledger: &L, key: &str) -> Result<Bytes> {
    let versions = ledger.history_scan(key).await?;
    let entries: Vec<HistoryEntry> = versions.iter().map(HistoryEntry::from_version).collect();
    to_json(&entries)
}

/// One rendered history record.
///
/// Field names match the wire format external consumers already parse.
#[derive(Debug, Serialize)]
struct HistoryEntry {
    #[serde(rename = "TxId")]
    tx_id: String,
    #[serde(rename = "Value")]
    value: Option<serde_json::Value>,
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "IsDelete")]
    is_delete: bool,
}

impl HistoryEntry {
    fn from_version(version: &KeyVersion) -> Self {
        Self {
            tx_id: version.tx_id.clone(),
            value: version.value.as_ref().map(|raw| render_value(raw)),
            timestamp: render_timestamp(version.timestamp_ms),
            is_delete: version.is_delete,
        }
    }
}

/// Render a stored value for embedding in a JSON document.
///
/// Values that are themselves JSON embed structurally; everything else is
/// carried as a string (lossy only for invalid UTF-8, which cannot be
/// represented in JSON anyway).
fn render_value(raw: &Bytes) -> serde_json::Value {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(raw) {
        value
    } else {
        serde_json::Value::String(String::from_utf8_lossy(raw).into_owned())
    }
}

fn render_timestamp(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.to_rfc3339(),
        None => timestamp_ms.to_string(),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use statemap_ledger::MemoryLedger;

    #[tokio::test]
    async fn test_list_keys_renders_json_array() {
        let ledger = MemoryLedger::new();
        for key in ["b", "a", "c"] {
            ledger.put_state(key, Bytes::from_static(b"1")).await.unwrap();
        }

        let out = list_keys(&ledger, "a", "c", 0).await.unwrap();
        let keys: Vec<String> = serde_json::from_slice(&out).unwrap();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_history_tombstone_renders_null_value() {
        let ledger = MemoryLedger::new();
        ledger.put_state("k", Bytes::from_static(b"{\"n\":1}")).await.unwrap();
        ledger.delete_state("k").await.unwrap();

        let out = history_records(&ledger, "k").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let records = parsed.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Value"]["n"], 1);
        assert_eq!(records[1]["Value"], serde_json::Value::Null);
        assert_eq!(records[1]["IsDelete"], true);
    }

    #[tokio::test]
    async fn test_non_json_value_is_escaped_not_spliced() {
        let ledger = MemoryLedger::new();
        // A value that would corrupt the array if spliced raw.
        ledger
            .put_state("k", Bytes::from_static(b"not \"json\", at all]"))
            .await
            .unwrap();

        let out = history_records(&ledger, "k").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["Value"], "not \"json\", at all]");
    }

    #[test]
    fn test_timestamp_renders_rfc3339() {
        let rendered = render_timestamp(0);
        assert!(rendered.starts_with("1970-01-01T00:00:00"));
    }
}
