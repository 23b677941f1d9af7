//! # statemap Core
//!
//! Core primitives for the statemap engine: principals, capabilities, and
//! the record types exchanged with the ledger substrate.
//!
//! ## Overview
//!
//! statemap is a permission-gated key-value access layer that runs as a unit
//! of business logic on top of an external, append-only ledger. This crate
//! holds the leaf types everything else builds on:
//!
//! - **Principal**: the opaque, pre-authenticated caller identity, normalized
//!   so it is always a well-formed namespace key
//! - **Capability / CapabilitySet**: the unit of authorization (`read`,
//!   `write`, `admin`) with the legacy textual wire encoding
//! - **KeyValue / KeyVersion**: records produced by substrate scans
//!
//! ## Key Concepts
//!
//! - Identities are opaque: this crate never parses or validates them beyond
//!   UTF-8 normalization.
//! - Capability membership is exact. The stored wire encoding is a delimited
//!   token list, but a token confers a capability only on an exact match.

pub mod capability;
pub mod error;
pub mod history;
pub mod identity;

pub use capability::{Capability, CapabilitySet};
pub use error::{CoreError, Result};
pub use history::{KeyValue, KeyVersion};
pub use identity::Principal;
