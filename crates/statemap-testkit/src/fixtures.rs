//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: an engine over an in-memory
//! ledger with a bootstrapped admin identity and helpers for impersonating
//! principals.

use bytes::Bytes;

use statemap::ledger::MemoryLedger;
use statemap::{Engine, EngineConfig, Invocation, Principal};
use statemap_core::CapabilitySet;
use statemap_perms::PermissionStore;

/// Identity used as the bootstrap admin in fixtures.
pub const ADMIN_IDENTITY: &[u8] = b"testbench-admin";

/// A test bench: an engine over a memory ledger, already bootstrapped.
pub struct TestBench {
    engine: Engine<MemoryLedger>,
}

impl TestBench {
    /// Create a bench whose bootstrap admin is [`ADMIN_IDENTITY`].
    pub async fn new() -> Self {
        let ledger = MemoryLedger::with_invoker(ADMIN_IDENTITY);
        let engine = Engine::new(ledger, EngineConfig::default());
        engine.init().await.expect("bootstrap init");
        Self { engine }
    }

    /// The engine under test.
    pub fn engine(&self) -> &Engine<MemoryLedger> {
        &self.engine
    }

    /// The ledger behind the engine.
    pub fn ledger(&self) -> &MemoryLedger {
        self.engine.ledger()
    }

    /// Make subsequent invocations run as `identity`.
    pub fn act_as(&self, identity: &[u8]) {
        self.ledger().set_invoker(Bytes::copy_from_slice(identity));
    }

    /// Make subsequent invocations run as the bootstrap admin.
    pub fn act_as_admin(&self) {
        self.act_as(ADMIN_IDENTITY);
    }

    /// Dispatch an operation with string arguments as the current identity.
    pub async fn invoke(&self, operation: &str, args: &[&str]) -> statemap::Result<Bytes> {
        self.engine
            .dispatch(&Invocation::from_strs(operation, args))
            .await
    }

    /// Grant `identity` a capability set directly, bypassing the workflow.
    ///
    /// For tests that need a principal in a known state without running the
    /// request/approve protocol.
    pub async fn grant_directly(&self, identity: &[u8], set: CapabilitySet) {
        let principal = Principal::from_raw(identity);
        PermissionStore::new(self.ledger())
            .grant(&principal, set)
            .await
            .expect("direct grant");
    }
}
