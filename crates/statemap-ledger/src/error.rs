//! Error types for the ledger boundary.

use thiserror::Error;

/// Errors that can occur at the substrate boundary.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The substrate could not supply an invoker identity.
    #[error("invoker identity unavailable")]
    IdentityUnavailable,

    /// A key or composite-key part is not representable in the namespace.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The substrate rejected an event emission.
    #[error("event rejected: {0}")]
    EventRejected(String),

    /// Invalid data read back from storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
