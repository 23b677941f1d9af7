//! SQLite implementation of the Ledger trait.
//!
//! Backs the engine in embedding scenarios where no real ledger network is
//! attached. Uses rusqlite with bundled SQLite, wrapped in async via
//! `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use statemap_core::{KeyValue, KeyVersion};

use crate::error::{LedgerError, Result};
use crate::migration;
use crate::traits::{EmittedEvent, Ledger};

/// SQLite-based ledger implementation.
///
/// Thread-safe via an internal Mutex around the connection. All trait
/// methods use `spawn_blocking` so SQLite never blocks the async runtime.
/// Keys are stored as BLOBs so composite keys (which embed U+0000
/// delimiters) order by memcmp, matching the native range-scan ordering.
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
    invoker: RwLock<Option<Bytes>>,
}

impl SqliteLedger {
    /// Open a ledger database at the given path, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        tracing::debug!(path = %path.as_ref().display(), "opening ledger database");
        let mut conn = Connection::open(path.as_ref())?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            invoker: RwLock::new(None),
        })
    }

    /// Open an in-memory database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            invoker: RwLock::new(None),
        })
    }

    /// Set the identity reported for subsequent invocations.
    pub fn set_invoker(&self, identity: impl Into<Bytes>) {
        *self.invoker.write().unwrap() = Some(identity.into());
    }

    /// All events emitted so far, in emission order.
    pub fn events(&self) -> Result<Vec<EmittedEvent>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT name, payload FROM events ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let payload: Vec<u8> = row.get(1)?;
            Ok(EmittedEvent {
                name,
                payload: Bytes::from(payload),
            })
        })?;
        rows.map(|r| r.map_err(LedgerError::from)).collect()
    }

    /// Run a closure against the locked connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            f(&conn)
        })
        .await
        .map_err(|e| LedgerError::InvalidData(format!("blocking task failed: {}", e)))?
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> Result<std::sync::MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| {
        LedgerError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            Some(format!("mutex poisoned: {}", e)),
        ))
    })
}

fn next_tx_id(conn: &Connection) -> Result<String> {
    let next: i64 = conn.query_row("SELECT COALESCE(MAX(seq), 0) + 1 FROM history", [], |row| {
        row.get(0)
    })?;
    Ok(format!("tx{:08}", next))
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        let key = key.as_bytes().to_vec();
        self.with_conn(move |conn| {
            let value: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM state WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.map(Bytes::from))
        })
        .await
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        let key = key.as_bytes().to_vec();
        self.with_conn(move |conn| {
            let tx_id = next_tx_id(conn)?;
            conn.execute(
                "INSERT INTO state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value.as_ref()],
            )?;
            conn.execute(
                "INSERT INTO history (key, tx_id, value, timestamp, is_delete)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![key, tx_id, value.as_ref(), now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete_state(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        self.with_conn(move |conn| {
            let tx_id = next_tx_id(conn)?;
            conn.execute("DELETE FROM state WHERE key = ?1", params![key])?;
            conn.execute(
                "INSERT INTO history (key, tx_id, value, timestamp, is_delete)
                 VALUES (?1, ?2, NULL, ?3, 1)",
                params![key, tx_id, now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        let start = start.as_bytes().to_vec();
        let end = end.as_bytes().to_vec();
        self.with_conn(move |conn| {
            // Empty bounds mean unbounded on that side; BLOB comparison is
            // memcmp, which is the native ordering.
            let mut stmt = conn.prepare(
                "SELECT key, value FROM state
                 WHERE (?1 = x'' OR key >= ?1) AND (?2 = x'' OR key < ?2)
                 ORDER BY key",
            )?;
            let rows = stmt.query_map(params![start, end], row_to_key_value)?;
            rows.map(|r| r.map_err(LedgerError::from)).collect()
        })
        .await
    }

    async fn rich_query(&self, expr: &str) -> Result<Vec<KeyValue>> {
        // This backend's query language: a plain key prefix.
        let prefix = expr.as_bytes().to_vec();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT key, value FROM state WHERE key >= ?1 ORDER BY key",
            )?;
            let rows = stmt.query_map(params![prefix.clone()], row_to_key_value)?;
            let mut out = Vec::new();
            for row in rows {
                let kv = row?;
                if !kv.key.as_bytes().starts_with(&prefix) {
                    break;
                }
                out.push(kv);
            }
            Ok(out)
        })
        .await
    }

    async fn history_scan(&self, key: &str) -> Result<Vec<KeyVersion>> {
        let key = key.as_bytes().to_vec();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT tx_id, value, timestamp, is_delete FROM history
                 WHERE key = ?1 ORDER BY seq",
            )?;
            let rows = stmt.query_map(params![key], |row| {
                let tx_id: String = row.get(0)?;
                let value: Option<Vec<u8>> = row.get(1)?;
                let timestamp_ms: i64 = row.get(2)?;
                let is_delete: bool = row.get(3)?;
                Ok(KeyVersion {
                    tx_id,
                    value: value.map(Bytes::from),
                    timestamp_ms,
                    is_delete,
                })
            })?;
            rows.map(|r| r.map_err(LedgerError::from)).collect()
        })
        .await
    }

    async fn emit_event(&self, name: &str, payload: Bytes) -> Result<()> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO events (name, payload, emitted_at) VALUES (?1, ?2, ?3)",
                params![name, payload.as_ref(), now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn invoker_identity(&self) -> Result<Bytes> {
        self.invoker
            .read()
            .unwrap()
            .clone()
            .ok_or(LedgerError::IdentityUnavailable)
    }
}

fn row_to_key_value(row: &rusqlite::Row<'_>) -> rusqlite::Result<KeyValue> {
    let key: Vec<u8> = row.get(0)?;
    let value: Vec<u8> = row.get(1)?;
    Ok(KeyValue {
        // Keys written through the Ledger trait are always valid UTF-8.
        key: String::from_utf8_lossy(&key).into_owned(),
        value: Bytes::from(value),
    })
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
