//! # statemap Ledger
//!
//! The substrate boundary for the statemap engine. The real ledger — its
//! durability, consensus, and transaction isolation — lives outside this
//! workspace; everything the engine needs from it is abstracted behind the
//! [`Ledger`] trait.
//!
//! ## Key Types
//!
//! - [`Ledger`] - the async trait for all substrate operations
//! - [`MemoryLedger`] - BTreeMap-backed ledger for tests and examples
//! - [`SqliteLedger`] - rusqlite-backed ledger for embedding scenarios
//! - [`EmittedEvent`] - a notification recorded by `emit_event`
//!
//! ## Design Notes
//!
//! - **Append-only history**: both backends record every put and delete as a
//!   per-key version with a synthetic transaction id, so history scans work
//!   the same way they do on a real ledger.
//! - **Native ordering**: range scans return keys in lexicographic byte
//!   order, the substrate-native ordering the engine's listing relies on.
//! - **Serialization of conflicts** is a substrate responsibility; these
//!   backends serialize everything behind a lock, which is the strongest
//!   version of that guarantee.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use traits::{composite_index_range, composite_key, EmittedEvent, Ledger};
