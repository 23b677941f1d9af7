//! The authorization gate.
//!
//! A pure read-only predicate over the permission store: may this principal
//! exercise this capability right now? Every mutating or read operation in
//! the engine asks the gate first; a deny aborts the operation before any
//! state change.

use statemap_core::{Capability, Principal};
use statemap_ledger::Ledger;

use crate::error::{PermsError, Result};
use crate::store::PermissionStore;

/// Answers allow/deny for a (principal, capability) pair.
pub struct AuthorizationGate<'a, L: Ledger> {
    store: PermissionStore<'a, L>,
}

impl<'a, L: Ledger> AuthorizationGate<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            store: PermissionStore::new(ledger),
        }
    }

    /// Exact membership test against the principal's stored set.
    ///
    /// Absent or undecodable entries deny. Read-only: no side effects.
    pub async fn allows(&self, principal: &Principal, capability: Capability) -> Result<bool> {
        let allowed = self
            .store
            .get(principal)
            .await?
            .map(|set| set.contains(capability))
            .unwrap_or(false);

        if !allowed {
            tracing::debug!(
                principal = %principal,
                capability = capability.token(),
                "authorization denied"
            );
        }
        Ok(allowed)
    }

    /// Like [`allows`](Self::allows), but a deny becomes `Forbidden`.
    pub async fn require(&self, principal: &Principal, capability: Capability) -> Result<()> {
        if self.allows(principal, capability).await? {
            Ok(())
        } else {
            Err(PermsError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statemap_core::CapabilitySet;
    use statemap_ledger::MemoryLedger;

    #[tokio::test]
    async fn test_no_entry_denies_everything() {
        let ledger = MemoryLedger::new();
        let gate = AuthorizationGate::new(&ledger);
        let p = Principal::from("stranger");

        for cap in [Capability::Read, Capability::Write, Capability::Admin] {
            assert!(!gate.allows(&p, cap).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_read_write_grant_does_not_confer_admin() {
        let ledger = MemoryLedger::new();
        let store = PermissionStore::new(&ledger);
        let gate = AuthorizationGate::new(&ledger);
        let p = Principal::from("member");

        store.grant(&p, CapabilitySet::read_write()).await.unwrap();

        assert!(gate.allows(&p, Capability::Read).await.unwrap());
        assert!(gate.allows(&p, Capability::Write).await.unwrap());
        assert!(!gate.allows(&p, Capability::Admin).await.unwrap());
    }

    #[tokio::test]
    async fn test_require_maps_deny_to_forbidden() {
        let ledger = MemoryLedger::new();
        let gate = AuthorizationGate::new(&ledger);
        let p = Principal::from("stranger");

        assert!(matches!(
            gate.require(&p, Capability::Write).await,
            Err(PermsError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_substring_token_entry_denies() {
        // A legacy-style entry holding "reader" must not confer read now
        // that membership is exact.
        let ledger = MemoryLedger::new();
        let gate = AuthorizationGate::new(&ledger);
        let p = Principal::from("sneaky");

        ledger
            .put_state("sneaky", bytes::Bytes::from_static(b"['reader']"))
            .await
            .unwrap();
        assert!(!gate.allows(&p, Capability::Read).await.unwrap());
    }
}
