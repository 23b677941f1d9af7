//! Principal identities.
//!
//! The substrate hands us an already-authenticated identity as raw bytes.
//! We treat it as opaque, except that it doubles as a namespace key, so it
//! must be well-formed text: invalid UTF-8 units are dropped (not replaced)
//! during normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The authenticated caller identity for an invocation.
///
/// Opaque to the engine. Constructed only through [`Principal::from_raw`],
/// which guarantees the inner string is valid UTF-8 and therefore safe to
/// use as a namespace key and composite-key part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Normalize a raw identity into a principal.
    ///
    /// Invalid encoding units are dropped, so two invocations by the same
    /// identity always normalize to the same key, and the grant written for
    /// a principal is found again by the authorization lookup.
    pub fn from_raw(raw: &[u8]) -> Self {
        Principal(normalize_identity(raw))
    }

    /// The namespace key for this principal.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identity bytes as stored in singleton slots.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Principal::from_raw(s.as_bytes())
    }
}

/// Drop invalid UTF-8 units from a raw identity.
fn normalize_identity(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let mut out = String::with_capacity(raw.len());
            let mut rest = raw;
            while !rest.is_empty() {
                match std::str::from_utf8(rest) {
                    Ok(s) => {
                        out.push_str(s);
                        break;
                    }
                    Err(e) => {
                        let (valid, after) = rest.split_at(e.valid_up_to());
                        if let Ok(s) = std::str::from_utf8(valid) {
                            out.push_str(s);
                        }
                        // Skip the offending unit(s); at the end of input,
                        // error_len() is None and nothing else remains.
                        let skip = e.error_len().unwrap_or(after.len());
                        rest = &after[skip.min(after.len())..];
                    }
                }
            }
            out
        }
    }
}
