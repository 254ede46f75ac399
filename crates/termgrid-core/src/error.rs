//! Error types for termgrid.
//!
//! Store mutations never fail for stale identifiers; unknown ids are
//! absorbed as no-ops. Errors here cover the edges that genuinely can
//! fail: config loading, snapshot decoding, and engine calls.

use thiserror::Error;

/// Main error type for termgrid operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Engine failed to spawn a shell process
    #[error("Spawn error: {0}")]
    SpawnError(String),

    /// Engine rejected or failed an input write
    #[error("Input error: {0}")]
    InputError(String),

    /// Persisted snapshot could not be decoded
    #[error("Snapshot decode error: {0}")]
    SnapshotDecode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
