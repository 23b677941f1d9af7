//! # statemap Permissions
//!
//! Permission storage, the authorization gate, and the two-step grant
//! workflow.
//!
//! ## Overview
//!
//! Every operation the engine exposes (other than submitting a permission
//! request) passes through the [`AuthorizationGate`] before touching state.
//! Grants live in the shared namespace keyed by principal id, written and
//! read by the [`PermissionStore`]. The [`PermissionWorkflow`] implements
//! the request → admin-approval → optional-rollback protocol over two
//! singleton slots.
//!
//! ## Key Concepts
//!
//! - **Deny by default**: no stored entry, or an entry that does not decode,
//!   means no capability.
//! - **Overwrite, not merge**: a grant replaces the prior capability set
//!   wholesale; there is no single-capability revocation.
//! - **One pending request**: the request slot is a singleton; a second
//!   submission fails until an admin consumes the first.

pub mod error;
pub mod gate;
pub mod store;
pub mod workflow;

pub use error::{PermsError, Result};
pub use gate::AuthorizationGate;
pub use store::PermissionStore;
pub use workflow::{PermissionWorkflow, LAST_GRANTED_KEY, PERMISSION_REQUEST_KEY};
