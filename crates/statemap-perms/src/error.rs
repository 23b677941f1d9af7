//! Error types for the permissions module.

use thiserror::Error;

use statemap_ledger::LedgerError;

/// Errors that can occur during permission operations.
#[derive(Debug, Error)]
pub enum PermsError {
    /// The caller lacks the required capability.
    #[error("forbidden")]
    Forbidden,

    /// A permission request is already pending.
    #[error("permission request already pending")]
    RequestAlreadyPending,

    /// An approval was attempted with no pending request.
    #[error("no permission request is pending")]
    NoPendingRequest,

    /// A rollback was attempted with no recorded grant.
    #[error("no grant to roll back")]
    NoGrantToRollback,

    /// The substrate rejected an event emission. Kept distinct from other
    /// ledger failures so callers can classify it as an emission failure.
    #[error("event emission failed: {0}")]
    Event(#[source] LedgerError),

    /// Substrate failure.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
