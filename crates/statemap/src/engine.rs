//! The Engine: authorization-gated state access over a ledger substrate.
//!
//! Every invocation resolves to one named operation. The operation first
//! passes through the authorization gate (except request submission, which
//! is open to any principal), then performs its state-map, query, or
//! workflow action, optionally updates the composite index, optionally
//! emits an event, and returns a single result payload.

use std::sync::Arc;

use bytes::Bytes;

use statemap_core::{Capability, CapabilitySet, Principal};
use statemap_ledger::Ledger;
use statemap_perms::{AuthorizationGate, PermissionStore, PermissionWorkflow};

use crate::error::{EngineError, Result};
use crate::invocation::Invocation;
use crate::query;

/// Reserved key recording the bootstrap principal; its presence makes
/// initialization idempotent.
pub const BOOTSTRAP_KEY: &str = "bootstrapPrincipal";

/// Sentinel value written to every composite index entry.
const INDEX_SENTINEL: &[u8] = &[0x00];

/// Event payload for state updates.
const EVENT_NEW_STATE: &[u8] = b"NEW STATE";

/// Event payloads for grant approvals.
const EVENT_READ_PERMISSION: &[u8] = b"ReadPermission";
const EVENT_READ_WRITE_PERMISSION: &[u8] = b"ReadWritePermission";

/// Success payload for unrecognized operations.
const UNSUPPORTED_OPERATION: &[u8] = b"Unsupported operation";

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Name of the secondary composite-key index written on every put.
    ///
    /// The default matches the index name external readers of the namespace
    /// already scan.
    pub index_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_name: "compositeKeyTest".to_string(),
        }
    }
}

/// The main engine struct.
///
/// Single-threaded per invocation by construction: the substrate serializes
/// conflicting invocations outside this layer, so the engine holds no locks
/// and spawns no tasks. All suspension points are the blocking calls into
/// the ledger.
pub struct Engine<L: Ledger> {
    ledger: Arc<L>,
    config: EngineConfig,
}

impl<L: Ledger> Engine<L> {
    /// Create a new engine over the given ledger.
    pub fn new(ledger: L, config: EngineConfig) -> Self {
        Self {
            ledger: Arc::new(ledger),
            config,
        }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// One-time initialization: grant the bootstrap identity everything.
    ///
    /// The bootstrap principal is recorded under [`BOOTSTRAP_KEY`]; if that
    /// record exists, re-running init is a no-op and never re-grants.
    pub async fn init(&self) -> Result<Bytes> {
        if self.ledger.get_state(BOOTSTRAP_KEY).await?.is_some() {
            tracing::debug!("namespace already bootstrapped; init is a no-op");
            return Ok(Bytes::new());
        }

        let principal = self.caller().await?;
        PermissionStore::new(&*self.ledger)
            .grant(&principal, CapabilitySet::all())
            .await?;
        self.ledger
            .put_state(BOOTSTRAP_KEY, Bytes::copy_from_slice(principal.as_bytes()))
            .await?;

        tracing::info!(principal = %principal, "bootstrap identity granted read, write, admin");
        Ok(Bytes::new())
    }

    /// Execute one invocation and return its result payload.
    pub async fn dispatch(&self, inv: &Invocation) -> Result<Bytes> {
        match inv.operation() {
            "put" => self.put(inv).await,
            "remove" => self.remove(inv).await,
            "get" => self.get(inv).await,
            "keys" => self.keys(inv).await,
            "query" => self.query(inv).await,
            "history" => self.history(inv).await,
            "custom_history" => self.custom_history(inv).await,
            "permissionRequest" => self.permission_request().await,
            "addReadPermission" => {
                self.approve(CapabilitySet::read_only(), EVENT_READ_PERMISSION)
                    .await
            }
            "addReadWritePermission" => {
                self.approve(CapabilitySet::read_write(), EVENT_READ_WRITE_PERMISSION)
                    .await
            }
            "dropLastGrantedPermission" => self.drop_last_granted().await,
            other => {
                tracing::debug!(operation = other, "unsupported operation");
                Ok(Bytes::from_static(UNSUPPORTED_OPERATION))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State Map
    // ─────────────────────────────────────────────────────────────────────────

    async fn put(&self, inv: &Invocation) -> Result<Bytes> {
        self.require(Capability::Write).await?;

        let key = inv.arg_str(0, "put", 2)?;
        let value = inv.arg(1, "put", 2)?.clone();

        // The current value is read for observability only; put never
        // branches on it.
        let current = self.ledger.get_state(key).await?;
        tracing::debug!(
            key,
            current_len = current.map(|v| v.len()).unwrap_or(0),
            new_len = value.len(),
            "writing state"
        );

        self.ledger.put_state(key, value).await?;

        let index_key = self.ledger.composite_key(&self.config.index_name, &[key])?;
        self.ledger
            .put_state(&index_key, Bytes::from_static(INDEX_SENTINEL))
            .await?;

        self.ledger
            .emit_event(key, Bytes::from_static(EVENT_NEW_STATE))
            .await
            .map_err(EngineError::Event)?;

        Ok(Bytes::new())
    }

    async fn remove(&self, inv: &Invocation) -> Result<Bytes> {
        self.require(Capability::Write).await?;

        let key = inv.arg_str(0, "remove", 1)?;
        // The composite index entry deliberately outlives the value: the
        // index records "has ever been written", not "currently exists".
        self.ledger.delete_state(key).await?;
        Ok(Bytes::new())
    }

    async fn get(&self, inv: &Invocation) -> Result<Bytes> {
        self.require(Capability::Read).await?;

        let key = inv.arg_str(0, "get", 1)?;
        let value = self.ledger.get_state(key).await?;
        // Absence and emptiness are not distinguished at this layer.
        Ok(value.unwrap_or_default())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Engine
    // ─────────────────────────────────────────────────────────────────────────

    async fn keys(&self, inv: &Invocation) -> Result<Bytes> {
        self.require(Capability::Read).await?;

        let start = inv.arg_str(0, "keys", 2)?;
        let end = inv.arg_str(1, "keys", 2)?;
        let delay_ms = match inv.opt_arg_str(2, "keys")? {
            None => 0,
            Some(raw) => raw.parse::<u64>().map_err(|e| EngineError::InvalidArgument {
                operation: "keys",
                detail: format!("delay is not a number: {}", e),
            })?,
        };

        query::list_keys(&*self.ledger, start, end, delay_ms).await
    }

    async fn query(&self, inv: &Invocation) -> Result<Bytes> {
        self.require(Capability::Read).await?;

        let expr = inv.arg_str(0, "query", 1)?;
        query::rich_query_keys(&*self.ledger, expr).await
    }

    async fn history(&self, inv: &Invocation) -> Result<Bytes> {
        self.require(Capability::Read).await?;

        let key = inv.arg_str(0, "history", 1)?;
        query::history_tx_ids(&*self.ledger, key).await
    }

    async fn custom_history(&self, inv: &Invocation) -> Result<Bytes> {
        self.require(Capability::Read).await?;

        let key = inv.arg_str(0, "custom_history", 1)?;
        query::history_records(&*self.ledger, key).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permission Workflow
    // ─────────────────────────────────────────────────────────────────────────

    async fn permission_request(&self) -> Result<Bytes> {
        // Deliberately ungated: any principal may ask.
        let principal = self.caller().await?;
        PermissionWorkflow::new(&*self.ledger)
            .submit_request(&principal)
            .await?;
        Ok(Bytes::new())
    }

    async fn approve(&self, set: CapabilitySet, event_payload: &'static [u8]) -> Result<Bytes> {
        self.require(Capability::Admin).await?;

        PermissionWorkflow::new(&*self.ledger)
            .approve(set, event_payload)
            .await?;
        Ok(Bytes::new())
    }

    async fn drop_last_granted(&self) -> Result<Bytes> {
        self.require(Capability::Admin).await?;

        PermissionWorkflow::new(&*self.ledger)
            .rollback_last_grant()
            .await?;
        Ok(Bytes::new())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve the current invoker to a normalized principal.
    async fn caller(&self) -> Result<Principal> {
        let raw = self.ledger.invoker_identity().await?;
        Ok(Principal::from_raw(&raw))
    }

    /// Gate the current invocation on `capability`.
    async fn require(&self, capability: Capability) -> Result<()> {
        let principal = self.caller().await?;
        AuthorizationGate::new(&*self.ledger)
            .require(&principal, capability)
            .await?;
        Ok(())
    }
}
