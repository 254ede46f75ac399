//! The contract with the external terminal engine.
//!
//! The engine owns PTY allocation, VT parsing, and rendering. termgrid
//! consumes it through this narrow surface: spawn a shell, push input
//! bytes, probe liveness, and receive line-level callbacks. The store
//! never owns a process; it holds a [`ProcessId`] purely as an
//! observation handle.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Non-owning handle to an engine-managed shell process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProcessId(pub i32);

impl ProcessId {
    /// Raw pid value.
    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-invasive process liveness check (signal-0 style; no side effects).
///
/// Split from [`TerminalEngine`] so the attention detector can depend on
/// just this capability.
pub trait LivenessProbe: Send + Sync {
    /// Whether the process behind the handle is still alive.
    fn is_alive(&self, handle: ProcessId) -> bool;
}

/// Operations termgrid invokes on the engine.
pub trait TerminalEngine: LivenessProbe {
    /// Spawn a shell process and return its handle.
    fn spawn(&self, shell: &str, env: &[(String, String)], cwd: Option<&str>)
        -> Result<ProcessId>;

    /// Send input bytes to a process.
    fn send_input(&self, handle: ProcessId, bytes: &[u8]) -> Result<()>;
}

/// Callbacks the engine invokes as output and lifecycle events occur.
///
/// The engine calls these from its own execution context. Implementations
/// must marshal onto the context that owns store state before mutating
/// anything; they must not touch session state inline.
pub trait EngineObserver: Send + Sync {
    /// A new or changed output line was produced by the engine's render pass.
    fn on_output_line(&self, handle: ProcessId, line: &str);

    /// The process exited with the given code.
    fn on_process_exit(&self, handle: ProcessId, exit_code: i32);

    /// The terminal title changed.
    fn on_title_change(&self, handle: ProcessId, title: &str);
}

/// An engine callback, reified for marshaling across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// New or changed output line
    OutputLine {
        /// Process the line belongs to
        handle: ProcessId,
        /// Line text after the engine's render pass
        line: String,
    },
    /// Process exited
    ProcessExit {
        /// Process that exited
        handle: ProcessId,
        /// Exit code
        exit_code: i32,
    },
    /// Terminal title changed
    TitleChange {
        /// Process whose title changed
        handle: ProcessId,
        /// New title text
        title: String,
    },
}
