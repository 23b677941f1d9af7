//! Error types for statemap core.

use thiserror::Error;

/// Errors from core primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown capability token: {0:?}")]
    InvalidCapability(String),

    #[error("malformed capability set encoding: {0:?}")]
    MalformedCapabilitySet(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
