//! Permission storage in the shared namespace.
//!
//! A principal's capability set is stored at the principal's own id, in the
//! legacy textual wire encoding. A grant overwrites any prior entry; there
//! is no union or per-capability removal.

use bytes::Bytes;

use statemap_core::{CapabilitySet, Principal};
use statemap_ledger::Ledger;

use crate::error::Result;

/// Reads and writes capability sets keyed by principal id.
pub struct PermissionStore<'a, L: Ledger> {
    ledger: &'a L,
}

impl<'a, L: Ledger> PermissionStore<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Write `set` as the principal's capability set, replacing any prior
    /// grant.
    pub async fn grant(&self, principal: &Principal, set: CapabilitySet) -> Result<()> {
        tracing::debug!(principal = %principal, set = %set.to_wire(), "writing grant");
        self.ledger
            .put_state(principal.as_str(), Bytes::from(set.to_wire()))
            .await?;
        Ok(())
    }

    /// Read the principal's capability set.
    ///
    /// Returns `None` when no entry exists. An entry that does not decode is
    /// also `None` — an unreadable grant confers nothing.
    pub async fn get(&self, principal: &Principal) -> Result<Option<CapabilitySet>> {
        let Some(raw) = self.ledger.get_state(principal.as_str()).await? else {
            return Ok(None);
        };

        match std::str::from_utf8(&raw).ok().map(CapabilitySet::from_wire) {
            Some(Ok(set)) => Ok(Some(set)),
            _ => {
                tracing::warn!(
                    principal = %principal,
                    "stored permission set does not decode; treating as no grant"
                );
                Ok(None)
            }
        }
    }

    /// Delete the principal's capability entry entirely (full revocation).
    pub async fn revoke(&self, principal: &Principal) -> Result<()> {
        tracing::debug!(principal = %principal, "revoking all capabilities");
        self.ledger.delete_state(principal.as_str()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statemap_ledger::MemoryLedger;

    #[tokio::test]
    async fn test_grant_overwrites_prior_set() {
        let ledger = MemoryLedger::new();
        let store = PermissionStore::new(&ledger);
        let alice = Principal::from("alice");

        store.grant(&alice, CapabilitySet::all()).await.unwrap();
        store.grant(&alice, CapabilitySet::read_only()).await.unwrap();

        let set = store.get(&alice).await.unwrap().unwrap();
        assert_eq!(set, CapabilitySet::read_only());
    }

    #[tokio::test]
    async fn test_absent_principal_has_no_set() {
        let ledger = MemoryLedger::new();
        let store = PermissionStore::new(&ledger);
        assert!(store.get(&Principal::from("nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_entry_reads_as_none() {
        let ledger = MemoryLedger::new();
        let store = PermissionStore::new(&ledger);
        let alice = Principal::from("alice");

        ledger
            .put_state(alice.as_str(), Bytes::from_static(b"garbage"))
            .await
            .unwrap();
        assert!(store.get(&alice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_deletes_entry() {
        let ledger = MemoryLedger::new();
        let store = PermissionStore::new(&ledger);
        let alice = Principal::from("alice");

        store.grant(&alice, CapabilitySet::read_write()).await.unwrap();
        store.revoke(&alice).await.unwrap();
        assert!(store.get(&alice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wire_bytes_match_legacy_namespace_format() {
        let ledger = MemoryLedger::new();
        let store = PermissionStore::new(&ledger);
        let alice = Principal::from("alice");

        store.grant(&alice, CapabilitySet::read_write()).await.unwrap();
        let raw = ledger.get_state("alice").await.unwrap().unwrap();
        assert_eq!(&raw[..], b"['read','write']");
    }
}
