//! Marshaling between engine threads and the host loop.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::debug;

use termgrid_core::{
    EngineEvent, EngineObserver, LivenessProbe, ProcessId, Result, TerminalEngine,
};

use crate::host::HostEvent;

/// Forwards engine callbacks into the host channel.
///
/// Engine threads call the observer methods; each one becomes a
/// [`HostEvent::Engine`] handled on the host's owning task, so the engine
/// never touches session state directly. Send failures mean the host has
/// shut down and are dropped.
#[derive(Debug, Clone)]
pub struct EngineBridge {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl EngineBridge {
    /// Wrap a host channel sender.
    pub fn new(tx: mpsc::UnboundedSender<HostEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: EngineEvent) {
        if self.tx.send(HostEvent::Engine(event)).is_err() {
            debug!("Host channel closed, dropping engine event");
        }
    }
}

impl EngineObserver for EngineBridge {
    fn on_output_line(&self, handle: ProcessId, line: &str) {
        self.send(EngineEvent::OutputLine {
            handle,
            line: line.to_string(),
        });
    }

    fn on_process_exit(&self, handle: ProcessId, exit_code: i32) {
        self.send(EngineEvent::ProcessExit { handle, exit_code });
    }

    fn on_title_change(&self, handle: ProcessId, title: &str) {
        self.send(EngineEvent::TitleChange {
            handle,
            title: title.to_string(),
        });
    }
}

/// In-process engine stand-in.
///
/// Hands out synthetic process handles and tracks which are "alive".
/// Used by the binary when no engine backend is wired up, and by tests
/// to drive lifecycle transitions deterministically.
#[derive(Debug)]
pub struct NullEngine {
    next_pid: AtomicI32,
    live: Mutex<HashSet<i32>>,
}

impl NullEngine {
    /// Create an engine with no live processes.
    pub fn new() -> Self {
        Self {
            next_pid: AtomicI32::new(1000),
            live: Mutex::new(HashSet::new()),
        }
    }

    /// Mark a handle dead, as if the process exited.
    pub fn kill(&self, handle: ProcessId) {
        self.live.lock().unwrap().remove(&handle.raw());
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessProbe for NullEngine {
    fn is_alive(&self, handle: ProcessId) -> bool {
        self.live.lock().unwrap().contains(&handle.raw())
    }
}

impl TerminalEngine for NullEngine {
    fn spawn(
        &self,
        _shell: &str,
        _env: &[(String, String)],
        _cwd: Option<&str>,
    ) -> Result<ProcessId> {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(pid);
        Ok(ProcessId(pid))
    }

    fn send_input(&self, _handle: ProcessId, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }
}
