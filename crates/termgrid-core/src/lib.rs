//! # termgrid-core
//!
//! Core types for the termgrid multi-pane terminal host.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other termgrid crates. It provides:
//!
//! - Identifier types (SessionId, GroupId, ProcessId)
//! - Status and layout enums (SessionStatus, LayoutMode)
//! - Pane geometry types (Size, Rect)
//! - The external engine contract (TerminalEngine, EngineObserver)
//! - Host configuration
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other termgrid crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all modules
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod session;

// Re-export commonly used types
pub use config::{
    AppearanceSettings, DetectionSettings, HostConfig, PromptPatternConfig, TerminalSettings,
    FONT_SIZE_MAX, FONT_SIZE_MIN,
};
pub use engine::{EngineEvent, EngineObserver, LivenessProbe, ProcessId, TerminalEngine};
pub use error::{Error, Result};
pub use geometry::{Rect, Size};
pub use session::{GroupId, LayoutMode, SessionId, SessionStatus};
