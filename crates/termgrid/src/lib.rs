//! termgrid host library
//!
//! This library contains the host event loop and engine marshaling.
//! The actual binary is in main.rs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod host;

// Re-export commonly used types
pub use engine::{EngineBridge, NullEngine};
pub use host::{Host, HostCommand, HostEvent};
