//! # termgrid-store
//!
//! Session, group, and layout state for the termgrid host.
//!
//! This crate provides:
//! - [`Session`] - one shell-process slot with attention status
//! - [`Group`] - ordered session clusters with a derived layout
//! - [`SessionStore`] - the single owner of all session/group state,
//!   exposing CRUD, selection, grouping, drag-drop, and the pure
//!   visible-set / effective-layout derivations
//! - [`StoreSnapshot`] - the strict persistence schema
//!
//! ## Architecture
//!
//! The store is pure in-memory state: no locks, no I/O, no blocking.
//! All mutation runs on the host's single owning context. Unknown
//! identifiers are absorbed as no-ops rather than raised as errors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod group;
pub mod session;
pub mod snapshot;
pub mod store;

// Re-export commonly used types
pub use group::Group;
pub use session::Session;
pub use snapshot::{GroupSnapshot, StoreSnapshot};
pub use store::SessionStore;
