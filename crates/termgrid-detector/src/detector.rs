//! The attention state machine.
//!
//! Two independent drivers feed each session's status:
//!
//! 1. A periodic tick re-evaluates liveness for every session. It never
//!    clears `Waiting` (only the output path can do that) and it never
//!    downgrades a quiet-but-alive session below `Running` (a long
//!    silence means "sitting at a prompt", not idle).
//! 2. Output-line events mark the session `Running`, then re-test the
//!    line against the prompt table; a match overrides to `Waiting`.
//!
//! `Error` is sticky on both paths: once a session errors it stays
//! errored across ticks and exits until the engine spawns a fresh
//! process for the slot.
//!
//! Only line-level text from the engine's own render pass is inspected,
//! and only on the context that owns store state; the engine's raw
//! character stream is never scanned from another thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use termgrid_core::{DetectionSettings, LivenessProbe, SessionId, SessionStatus};
use termgrid_store::{Session, SessionStore};

use crate::patterns::PromptMatcher;

/// Periodic + event-driven attention-state detector.
pub struct AttentionDetector {
    probe: Arc<dyn LivenessProbe>,
    matcher: PromptMatcher,
    quiet_threshold: Duration,
}

impl AttentionDetector {
    /// Create a detector over a liveness probe, using default settings.
    pub fn new(probe: Arc<dyn LivenessProbe>) -> Self {
        Self::with_settings(probe, &DetectionSettings::default())
    }

    /// Create a detector with configured quiet threshold and extra
    /// prompt patterns.
    pub fn with_settings(probe: Arc<dyn LivenessProbe>, settings: &DetectionSettings) -> Self {
        Self {
            probe,
            matcher: PromptMatcher::with_extra_patterns(&settings.extra_prompt_patterns),
            quiet_threshold: Duration::from_millis(settings.quiet_threshold_ms),
        }
    }

    /// Periodic driver: re-evaluate every session's status.
    pub fn evaluate_all(&self, store: &mut SessionStore) {
        let ids: Vec<SessionId> = store.sessions().iter().map(Session::id).collect();

        for id in ids {
            let Some(session) = store.session(id) else { continue };
            let next = self.evaluate(session);
            if next != session.status() {
                debug!(session = %id, from = ?session.status(), to = ?next, "status transition (tick)");
                if let Some(session) = store.session_mut(id) {
                    session.set_status(next);
                }
            }
        }
    }

    /// Status a single session should have right now, per the tick rules.
    pub fn evaluate(&self, session: &Session) -> SessionStatus {
        let sticky_or_idle = |status: SessionStatus| {
            if status == SessionStatus::Error {
                SessionStatus::Error
            } else {
                SessionStatus::Idle
            }
        };

        if !session.is_process_started() {
            return sticky_or_idle(session.status());
        }

        match session.process() {
            Some(handle) if self.probe.is_alive(handle) => {}
            _ => return sticky_or_idle(session.status()),
        }

        // Error and waiting survive the tick; waiting is cleared only by
        // the output-event path
        match session.status() {
            SessionStatus::Error => SessionStatus::Error,
            SessionStatus::Waiting => SessionStatus::Waiting,
            // Quiet but alive means sitting at a prompt, never idle
            _ => SessionStatus::Running,
        }
    }

    /// Whether the session has been silent past the quiet threshold.
    ///
    /// Purely informational for the presentation layer (a quiet running
    /// session is sitting at a prompt); it never feeds back into status.
    pub fn is_quiet(&self, session: &Session, now: Instant) -> bool {
        match session.last_output_time() {
            Some(last) => now.duration_since(last) > self.quiet_threshold,
            None => false,
        }
    }

    /// Event driver: a new or changed output line from the engine.
    ///
    /// Empty lines are ignored. Otherwise the session is marked running
    /// with a fresh output timestamp, then the line is tested against
    /// the prompt table; a match overrides the status to waiting
    /// regardless of what it was.
    pub fn on_output_line(&self, store: &mut SessionStore, id: SessionId, line: &str) {
        if line.is_empty() {
            return;
        }

        let is_prompt = self.matcher.is_input_prompt(line);
        let Some(session) = store.session_mut(id) else {
            return;
        };

        session.touch_output(Instant::now());
        session.set_status(SessionStatus::Running);
        if is_prompt {
            trace!(session = %id, "input prompt detected");
            session.set_status(SessionStatus::Waiting);
        }
    }

    /// Event driver: the engine reports the session's process exited.
    ///
    /// Exit clears waiting the same way it clears running: the prompt
    /// belonged to a process that no longer exists. A zero exit code
    /// lands on idle; a non-zero code marks the session errored, which
    /// then sticks until the slot is respawned.
    pub fn on_process_exit(&self, store: &mut SessionStore, id: SessionId, exit_code: i32) {
        let Some(session) = store.session_mut(id) else {
            return;
        };

        session.mark_process_exited();
        let next = if session.status() == SessionStatus::Error || exit_code != 0 {
            SessionStatus::Error
        } else {
            SessionStatus::Idle
        };
        debug!(session = %id, exit_code, status = ?next, "process exited");
        session.set_status(next);
    }
}

impl std::fmt::Debug for AttentionDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttentionDetector")
            .field("quiet_threshold", &self.quiet_threshold)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use termgrid_core::ProcessId;

    /// Probe over a fixed set of live pids.
    #[derive(Default)]
    struct FakeProbe {
        alive: Mutex<HashSet<i32>>,
    }

    impl FakeProbe {
        fn set_alive(&self, pid: i32, alive: bool) {
            let mut set = self.alive.lock().unwrap();
            if alive {
                set.insert(pid);
            } else {
                set.remove(&pid);
            }
        }
    }

    impl LivenessProbe for FakeProbe {
        fn is_alive(&self, handle: ProcessId) -> bool {
            self.alive.lock().unwrap().contains(&handle.raw())
        }
    }

    fn detector_with_probe() -> (AttentionDetector, Arc<FakeProbe>) {
        let probe = Arc::new(FakeProbe::default());
        (
            AttentionDetector::new(Arc::clone(&probe) as Arc<dyn LivenessProbe>),
            probe,
        )
    }

    fn started_session(store: &mut SessionStore, probe: &FakeProbe, pid: i32) -> SessionId {
        let id = store.create_session("Shell");
        store
            .session_mut(id)
            .unwrap()
            .mark_process_started(ProcessId(pid));
        probe.set_alive(pid, true);
        id
    }

    #[test]
    fn test_unstarted_session_stays_idle() {
        let (detector, _) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = store.create_session("Shell");

        detector.evaluate_all(&mut store);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Idle);
    }

    #[test]
    fn test_alive_session_runs() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.evaluate_all(&mut store);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Running);
    }

    #[test]
    fn test_dead_process_goes_idle() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        probe.set_alive(100, false);
        detector.evaluate_all(&mut store);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Idle);
    }

    #[test]
    fn test_quiet_session_still_running() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        // Last output well past the quiet threshold
        let long_ago = Instant::now() - Duration::from_secs(60);
        store.session_mut(id).unwrap().touch_output(long_ago);

        detector.evaluate_all(&mut store);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Running);
        assert!(detector.is_quiet(store.session(id).unwrap(), Instant::now()));
    }

    #[test]
    fn test_is_quiet_tracks_output_recency() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);
        let now = Instant::now();

        // No output observed yet
        assert!(!detector.is_quiet(store.session(id).unwrap(), now));

        detector.on_output_line(&mut store, id, "building...");
        assert!(!detector.is_quiet(store.session(id).unwrap(), now));

        store
            .session_mut(id)
            .unwrap()
            .touch_output(now - Duration::from_secs(10));
        assert!(detector.is_quiet(store.session(id).unwrap(), now));
    }

    #[test]
    fn test_waiting_survives_tick() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.on_output_line(&mut store, id, "Password:");
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Waiting);

        detector.evaluate_all(&mut store);
        detector.evaluate_all(&mut store);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Waiting);
    }

    #[test]
    fn test_output_clears_waiting() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.on_output_line(&mut store, id, "Password:");
        detector.on_output_line(&mut store, id, "Last login: Mon");
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Running);
    }

    #[test]
    fn test_shell_prompt_is_not_waiting() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.on_output_line(&mut store, id, "$ ls -la");
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Running);
    }

    #[test]
    fn test_empty_line_is_noop() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.on_output_line(&mut store, id, "Password:");
        detector.on_output_line(&mut store, id, "");
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Waiting);
        // The empty line must not refresh the output timestamp either
    }

    #[test]
    fn test_clean_exit_goes_idle_even_from_waiting() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.on_output_line(&mut store, id, "Proceed? ");
        detector.on_process_exit(&mut store, id, 0);

        let session = store.session(id).unwrap();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(!session.is_process_started());
        assert!(session.process().is_none());
    }

    #[test]
    fn test_failed_exit_marks_error() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.on_process_exit(&mut store, id, 127);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Error);
    }

    #[test]
    fn test_error_sticky_across_ticks_until_respawn() {
        let (detector, probe) = detector_with_probe();
        let mut store = SessionStore::new();
        let id = started_session(&mut store, &probe, 100);

        detector.on_process_exit(&mut store, id, 1);
        detector.evaluate_all(&mut store);
        detector.evaluate_all(&mut store);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Error);

        // A fresh spawn clears the sticky error
        store
            .session_mut(id)
            .unwrap()
            .mark_process_started(ProcessId(200));
        probe.set_alive(200, true);
        detector.evaluate_all(&mut store);
        assert_eq!(store.session(id).unwrap().status(), SessionStatus::Running);
    }

    #[test]
    fn test_events_for_unknown_session_are_noops() {
        let (detector, _) = detector_with_probe();
        let mut store = SessionStore::new();
        let ghost = SessionId::new();

        detector.on_output_line(&mut store, ghost, "Password:");
        detector.on_process_exit(&mut store, ghost, 1);
        assert!(store.is_empty());
    }
}
