//! # statemap
//!
//! A permission-gated key-value access engine executed as a unit of business
//! logic on top of an external, append-only ledger substrate.
//!
//! ## Overview
//!
//! statemap exposes CRUD-like operations (put, get, remove, range listing,
//! rich query, history) over a shared key-value namespace, enforces a simple
//! role-based policy per calling identity, maintains a secondary
//! composite-key index, and implements a two-step permission-grant workflow
//! (request → admin approval, with rollback).
//!
//! ## Key Concepts
//!
//! - **Principal**: the authenticated caller identity, opaque to the engine.
//! - **Capability**: `read`, `write`, or `admin`; the unit of authorization.
//! - **Ledger**: the external substrate all durable state is delegated to;
//!   see [`statemap_ledger::Ledger`].
//! - **Permission workflow**: how a principal acquires capabilities.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use statemap::{Engine, EngineConfig, Invocation};
//! use statemap_ledger::MemoryLedger;
//!
//! async fn example() {
//!     let ledger = MemoryLedger::with_invoker(&b"bootstrap-admin"[..]);
//!     let engine = Engine::new(ledger, EngineConfig::default());
//!
//!     // Grant the bootstrap identity full capabilities, once.
//!     engine.init().await.unwrap();
//!
//!     // Gated state access.
//!     let put = Invocation::from_strs("put", &["greeting", "hello"]);
//!     engine.dispatch(&put).await.unwrap();
//!
//!     let get = Invocation::from_strs("get", &["greeting"]);
//!     let value = engine.dispatch(&get).await.unwrap();
//!     assert_eq!(&value[..], b"hello");
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `statemap::core` - core primitives (Principal, CapabilitySet, records)
//! - `statemap::ledger` - the substrate boundary and bundled backends
//! - `statemap::perms` - permission store, gate, and workflow

pub mod engine;
pub mod error;
pub mod invocation;
pub mod query;

// Re-export component crates
pub use statemap_core as core;
pub use statemap_ledger as ledger;
pub use statemap_perms as perms;

// Re-export main types for convenience
pub use engine::{Engine, EngineConfig, BOOTSTRAP_KEY};
pub use error::{EngineError, Result};
pub use invocation::Invocation;

// Re-export commonly used core types
pub use statemap_core::{Capability, CapabilitySet, KeyValue, KeyVersion, Principal};
