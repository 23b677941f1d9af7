//! Error types for the engine.
//!
//! This is the failure surface callers see: each variant carries a
//! human-readable message, nothing is retried internally, and no operation
//! rolls back earlier sub-steps on its own (atomicity across sub-writes is
//! whatever the substrate's transaction boundary provides).

use thiserror::Error;

use statemap_ledger::LedgerError;
use statemap_perms::PermsError;

/// Errors that can occur while executing an invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller lacks the required capability.
    #[error("forbidden")]
    Unauthorized,

    /// The operation was invoked with too few arguments.
    #[error("{operation} operation requires {expected} argument(s)")]
    MissingArgument {
        operation: &'static str,
        expected: usize,
    },

    /// An argument was present but not usable.
    #[error("invalid argument for {operation}: {detail}")]
    InvalidArgument {
        operation: &'static str,
        detail: String,
    },

    /// An underlying read/write/delete failed.
    #[error("storage failure: {0}")]
    Storage(#[source] LedgerError),

    /// The substrate rejected an event emission. Fatal for the operation.
    #[error("event emission failed: {0}")]
    Event(#[source] LedgerError),

    /// A permission request is already pending.
    #[error("permission request already pending")]
    RequestAlreadyPending,

    /// An approval was attempted with no pending request.
    #[error("no permission request is pending")]
    NoPendingRequest,

    /// A rollback was attempted with no recorded grant.
    #[error("no grant to roll back")]
    NoGrantToRollback,

    /// Result encoding failed.
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The substrate could not supply an identity for this invocation.
    #[error("invoker identity unavailable")]
    IdentityUnavailable,
}

impl From<LedgerError> for EngineError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::IdentityUnavailable => EngineError::IdentityUnavailable,
            other => EngineError::Storage(other),
        }
    }
}

impl From<PermsError> for EngineError {
    fn from(e: PermsError) -> Self {
        match e {
            PermsError::Forbidden => EngineError::Unauthorized,
            PermsError::RequestAlreadyPending => EngineError::RequestAlreadyPending,
            PermsError::NoPendingRequest => EngineError::NoPendingRequest,
            PermsError::NoGrantToRollback => EngineError::NoGrantToRollback,
            PermsError::Event(inner) => EngineError::Event(inner),
            PermsError::Ledger(inner) => inner.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
