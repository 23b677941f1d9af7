//! # statemap Testkit
//!
//! Testing utilities for the statemap engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a bootstrapped engine-over-memory-ledger bench with
//!   principal impersonation helpers
//! - **Generators**: proptest strategies for keys, values, identities, and
//!   capability sets
//! - **Wire vectors**: golden encodings of the formats external namespace
//!   readers depend on
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use statemap_testkit::TestBench;
//!
//! async fn example() {
//!     let bench = TestBench::new().await;
//!     bench.invoke("put", &["k", "v"]).await.unwrap();
//!
//!     bench.act_as(b"someone-else");
//!     assert!(bench.invoke("get", &["k"]).await.is_err());
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{TestBench, ADMIN_IDENTITY};
