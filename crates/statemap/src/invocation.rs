//! Invocations: the unit of work delivered by the substrate.
//!
//! An invocation names one operation and carries its raw byte arguments.
//! Transport and session plumbing live outside this crate; by the time an
//! invocation arrives here it is already authenticated and addressed.

use bytes::Bytes;

use crate::error::{EngineError, Result};

/// One request against the engine: an operation name plus raw arguments.
#[derive(Debug, Clone)]
pub struct Invocation {
    operation: String,
    args: Vec<Bytes>,
}

impl Invocation {
    pub fn new(operation: impl Into<String>, args: Vec<Bytes>) -> Self {
        Self {
            operation: operation.into(),
            args,
        }
    }

    /// Convenience constructor for string arguments.
    pub fn from_strs(operation: impl Into<String>, args: &[&str]) -> Self {
        Self::new(
            operation,
            args.iter().map(|a| Bytes::copy_from_slice(a.as_bytes())).collect(),
        )
    }

    /// The operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Raw argument at `index`; `MissingArgument` when out of range.
    pub fn arg(&self, index: usize, operation: &'static str, expected: usize) -> Result<&Bytes> {
        self.args.get(index).ok_or(EngineError::MissingArgument {
            operation,
            expected,
        })
    }

    /// Argument at `index` as UTF-8 text.
    pub fn arg_str(&self, index: usize, operation: &'static str, expected: usize) -> Result<&str> {
        let raw = self.arg(index, operation, expected)?;
        std::str::from_utf8(raw).map_err(|e| EngineError::InvalidArgument {
            operation,
            detail: format!("argument {} is not valid UTF-8: {}", index, e),
        })
    }

    /// Optional argument at `index` as UTF-8 text (for trailing arguments).
    pub fn opt_arg_str(&self, index: usize, operation: &'static str) -> Result<Option<&str>> {
        match self.args.get(index) {
            None => Ok(None),
            Some(raw) => std::str::from_utf8(raw)
                .map(Some)
                .map_err(|e| EngineError::InvalidArgument {
                    operation,
                    detail: format!("argument {} is not valid UTF-8: {}", index, e),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_reports_operation_and_arity() {
        let inv = Invocation::from_strs("put", &["only-key"]);
        let err = inv.arg(1, "put", 2).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingArgument {
                operation: "put",
                expected: 2
            }
        ));
    }

    #[test]
    fn test_non_utf8_argument_is_invalid_not_missing() {
        let inv = Invocation::new("get", vec![Bytes::from_static(&[0xff, 0xfe])]);
        let err = inv.arg_str(0, "get", 1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument { .. }));
    }

    #[test]
    fn test_optional_argument_absent_is_none() {
        let inv = Invocation::from_strs("keys", &["a", "z"]);
        assert!(inv.opt_arg_str(2, "keys").unwrap().is_none());
    }
}
