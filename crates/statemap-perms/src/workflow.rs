//! The permission-grant workflow.
//!
//! A two-state protocol over two singleton namespace slots:
//!
//! - `permissionRequest` — at most one pending request at a time, holding
//!   the requesting principal's id. Written by `submit_request` (no
//!   authorization required), consumed by `approve`.
//! - `lastGrantedUser` — the principal most recently granted capabilities,
//!   overwritten on every approval and consumed by `rollback_last_grant`.
//!
//! Admin gating for approve/rollback happens in the engine before these
//! methods are called.
//!
//! The existence checks here are read-then-write with no compare-and-swap;
//! two truly concurrent submissions racing on the request slot are expected
//! to be serialized (or one rejected) by the substrate's own conflict
//! detection.

use bytes::Bytes;

use statemap_core::{CapabilitySet, Principal};
use statemap_ledger::Ledger;

use crate::error::{PermsError, Result};
use crate::store::PermissionStore;

/// Singleton slot holding the pending request, if any.
pub const PERMISSION_REQUEST_KEY: &str = "permissionRequest";

/// Singleton slot recording the most recent grantee.
pub const LAST_GRANTED_KEY: &str = "lastGrantedUser";

/// Drives the request → approve → rollback protocol.
pub struct PermissionWorkflow<'a, L: Ledger> {
    ledger: &'a L,
    store: PermissionStore<'a, L>,
}

impl<'a, L: Ledger> PermissionWorkflow<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            store: PermissionStore::new(ledger),
        }
    }

    /// Submit a permission request for `principal`.
    ///
    /// Fails with `RequestAlreadyPending` while another request occupies the
    /// slot. Any principal may submit; no capability is required.
    pub async fn submit_request(&self, principal: &Principal) -> Result<()> {
        if self.pending_request().await?.is_some() {
            return Err(PermsError::RequestAlreadyPending);
        }

        tracing::debug!(principal = %principal, "recording permission request");
        self.ledger
            .put_state(PERMISSION_REQUEST_KEY, Bytes::copy_from_slice(principal.as_bytes()))
            .await?;
        Ok(())
    }

    /// The principal currently waiting for approval, if any.
    pub async fn pending_request(&self) -> Result<Option<Principal>> {
        let raw = self.ledger.get_state(PERMISSION_REQUEST_KEY).await?;
        Ok(raw.map(|bytes| Principal::from_raw(&bytes)))
    }

    /// Approve the pending request with the given capability set.
    ///
    /// Fails with `NoPendingRequest` when the slot is empty; approving into
    /// thin air must never grant anything. On success the grantee's set is
    /// written, an event named by the grantee's key is emitted with
    /// `event_payload`, the last-granted record is updated, and the request
    /// slot is cleared.
    pub async fn approve(
        &self,
        set: CapabilitySet,
        event_payload: &'static [u8],
    ) -> Result<Principal> {
        let grantee = self
            .pending_request()
            .await?
            .ok_or(PermsError::NoPendingRequest)?;

        self.store.grant(&grantee, set).await?;

        self.ledger
            .emit_event(grantee.as_str(), Bytes::from_static(event_payload))
            .await
            .map_err(PermsError::Event)?;

        self.ledger
            .put_state(LAST_GRANTED_KEY, Bytes::copy_from_slice(grantee.as_bytes()))
            .await?;

        self.ledger.delete_state(PERMISSION_REQUEST_KEY).await?;

        tracing::debug!(grantee = %grantee, set = %set.to_wire(), "permission request approved");
        Ok(grantee)
    }

    /// Roll back the most recent grant.
    ///
    /// Deletes the last-granted record and the grantee's entire capability
    /// entry. This is full revocation, not restoration of a prior set — no
    /// grant history is kept.
    pub async fn rollback_last_grant(&self) -> Result<Principal> {
        let raw = self
            .ledger
            .get_state(LAST_GRANTED_KEY)
            .await?
            .ok_or(PermsError::NoGrantToRollback)?;
        let grantee = Principal::from_raw(&raw);

        self.ledger.delete_state(LAST_GRANTED_KEY).await?;
        self.store.revoke(&grantee).await?;

        tracing::debug!(grantee = %grantee, "rolled back last grant");
        Ok(grantee)
    }
}
