//! Capabilities and capability sets.
//!
//! A capability is the unit of authorization. A principal's grant is stored
//! in the shared namespace as a delimited token list; historically that
//! encoding was tested by substring containment, which let tokens like
//! `"reader"` confer `read`. Here the set is a small bitmask and membership
//! is decided by exact token match, while the external wire encoding is kept
//! byte-for-byte so existing namespace entries remain readable.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single capability that can be granted to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Read access: get, range listing, rich query, history.
    Read,
    /// Write access: put and remove.
    Write,
    /// Administrative access: approving and rolling back grants.
    Admin,
}

impl Capability {
    /// The wire token for this capability.
    pub fn token(self) -> &'static str {
        match self {
            Capability::Read => "read",
            Capability::Write => "write",
            Capability::Admin => "admin",
        }
    }

    /// Parse a wire token. Exact match only.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "read" => Ok(Capability::Read),
            "write" => Ok(Capability::Write),
            "admin" => Ok(Capability::Admin),
            other => Err(CoreError::InvalidCapability(other.to_string())),
        }
    }

    fn bit(self) -> u8 {
        match self {
            Capability::Read => 0b001,
            Capability::Write => 0b010,
            Capability::Admin => 0b100,
        }
    }
}

/// A set of capabilities, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    bits: u8,
}

impl CapabilitySet {
    /// The empty set.
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// `{read}` — the read-only grant.
    pub fn read_only() -> Self {
        Self::empty().with(Capability::Read)
    }

    /// `{read, write}` — the standard read-write grant.
    pub fn read_write() -> Self {
        Self::empty().with(Capability::Read).with(Capability::Write)
    }

    /// `{read, write, admin}` — the bootstrap grant.
    pub fn all() -> Self {
        Self::read_write().with(Capability::Admin)
    }

    /// Return a copy with `cap` added.
    pub fn with(mut self, cap: Capability) -> Self {
        self.bits |= cap.bit();
        self
    }

    /// Exact membership test.
    pub fn contains(&self, cap: Capability) -> bool {
        self.bits & cap.bit() != 0
    }

    /// True if no capability is set.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate members in wire order (read, write, admin).
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        [Capability::Read, Capability::Write, Capability::Admin]
            .into_iter()
            .filter(|c| self.contains(*c))
    }

    /// Encode to the legacy wire form, e.g. `['read','write','admin']`.
    ///
    /// The encoding is byte-identical to what earlier writers of the
    /// namespace produced, so external readers keep working.
    pub fn to_wire(&self) -> String {
        if self.is_empty() {
            return "[]".to_string();
        }
        let tokens: Vec<&str> = self.iter().map(Capability::token).collect();
        format!("['{}']", tokens.join("','"))
    }

    /// Decode the legacy wire form.
    ///
    /// Strict: every token must parse exactly; unknown tokens are an error
    /// rather than being silently matched by substring.
    pub fn from_wire(encoded: &str) -> Result<Self> {
        let trimmed = encoded.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| CoreError::MalformedCapabilitySet(encoded.to_string()))?;

        let mut set = CapabilitySet::empty();
        for raw in inner.split(',') {
            let token = raw.trim().trim_matches(|c| c == '\'' || c == '"');
            if token.is_empty() {
                continue;
            }
            set = set.with(Capability::from_token(token)?);
        }
        Ok(set)
    }
}
