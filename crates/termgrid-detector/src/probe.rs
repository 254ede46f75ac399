//! Process liveness probes.

use termgrid_core::{LivenessProbe, ProcessId};

/// Signal-0 liveness probe: asks the kernel whether the pid exists
/// without delivering a signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalProbe;

impl SignalProbe {
    /// Create a new signal-0 probe.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl LivenessProbe for SignalProbe {
    fn is_alive(&self, handle: ProcessId) -> bool {
        if handle.raw() <= 0 {
            return false;
        }
        // kill(pid, 0) performs permission and existence checks only
        unsafe { libc::kill(handle.raw(), 0) == 0 }
    }
}

#[cfg(not(unix))]
impl LivenessProbe for SignalProbe {
    fn is_alive(&self, _handle: ProcessId) -> bool {
        // No non-invasive probe on this platform; assume alive and let
        // the exit callback drive the idle transition
        true
    }
}
