//! # termgrid-detector
//!
//! Attention-state detection for the termgrid host.
//!
//! This crate provides:
//! - The input-prompt pattern table ([`PromptMatcher`])
//! - The two-driver attention state machine ([`AttentionDetector`])
//! - Process liveness probes ([`SignalProbe`])
//!
//! ## Architecture
//!
//! The detector mutates session status through the store's accessors,
//! always on the host's owning context. It never reads the engine's raw
//! character stream, only line-level text the engine has already
//! rendered, delivered through marshaled callbacks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod detector;
pub mod patterns;
pub mod probe;

// Re-export commonly used types
pub use detector::AttentionDetector;
pub use patterns::PromptMatcher;
pub use probe::SignalProbe;
