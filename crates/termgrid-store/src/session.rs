//! A single shell-session slot.

use std::time::Instant;

use termgrid_core::{ProcessId, SessionId, SessionStatus};

/// One shell-process slot: a name, an attention status, and a non-owning
/// view of the engine's process.
///
/// The store never owns the process lifecycle. [`Session::process`] is an
/// observation handle; killing the process on teardown is the engine's
/// responsibility.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    name: String,
    status: SessionStatus,
    last_output_time: Option<Instant>,
    process: Option<ProcessId>,
    process_started: bool,
    renaming: bool,
}

impl Session {
    /// Create a new idle session slot.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            name: name.into(),
            status: SessionStatus::Idle,
            last_output_time: None,
            process: None,
            process_started: false,
            renaming: false,
        }
    }

    /// Session identifier, stable for the slot's lifetime.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name directly (user rename).
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Apply a terminal-title update. Ignored while a rename is in
    /// progress so the engine cannot clobber the user's edit.
    pub fn apply_title(&mut self, title: &str) {
        if !self.renaming && !title.is_empty() {
            self.name = title.to_string();
        }
    }

    /// Whether a user rename is in progress.
    pub fn is_renaming(&self) -> bool {
        self.renaming
    }

    /// Mark the start of a user rename; title updates are ignored until
    /// [`Session::finish_rename`].
    pub fn begin_rename(&mut self) {
        self.renaming = true;
    }

    /// Mark the end of a user rename.
    pub fn finish_rename(&mut self) {
        self.renaming = false;
    }

    /// Current attention status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Set the attention status.
    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    /// Time of the most recent output event, if any.
    pub fn last_output_time(&self) -> Option<Instant> {
        self.last_output_time
    }

    /// Record an output event at `at`.
    pub fn touch_output(&mut self, at: Instant) {
        self.last_output_time = Some(at);
    }

    /// The engine's process handle, if a spawn has been requested.
    pub fn process(&self) -> Option<ProcessId> {
        self.process
    }

    /// Whether the engine has been asked to spawn the shell for this slot.
    pub fn is_process_started(&self) -> bool {
        self.process_started
    }

    /// Record that the engine spawned a shell for this slot.
    ///
    /// A fresh spawn clears a sticky `Error`: the failed process is gone
    /// and a new one is live.
    pub fn mark_process_started(&mut self, handle: ProcessId) {
        self.process = Some(handle);
        self.process_started = true;
        self.status = SessionStatus::Running;
    }

    /// Record that the process exited; the handle is severed but the
    /// engine remains responsible for reaping.
    pub fn mark_process_exited(&mut self) {
        self.process = None;
        self.process_started = false;
    }

    /// Sever the process reference without touching status, used on
    /// session removal.
    pub fn clear_process(&mut self) {
        self.process = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new("Shell");
        assert_eq!(session.name(), "Shell");
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(!session.is_process_started());
        assert!(session.process().is_none());
        assert!(session.last_output_time().is_none());
    }

    #[test]
    fn test_mark_process_started() {
        let mut session = Session::new("Shell");
        session.mark_process_started(ProcessId(100));
        assert!(session.is_process_started());
        assert_eq!(session.process(), Some(ProcessId(100)));
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_spawn_clears_sticky_error() {
        let mut session = Session::new("Shell");
        session.mark_process_started(ProcessId(100));
        session.set_status(SessionStatus::Error);

        session.mark_process_started(ProcessId(101));
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_title_ignored_during_rename() {
        let mut session = Session::new("Shell");
        session.begin_rename();
        session.apply_title("vim README.md");
        assert_eq!(session.name(), "Shell");

        session.finish_rename();
        session.apply_title("vim README.md");
        assert_eq!(session.name(), "vim README.md");
    }

    #[test]
    fn test_empty_title_ignored() {
        let mut session = Session::new("Shell");
        session.apply_title("");
        assert_eq!(session.name(), "Shell");
    }

    #[test]
    fn test_process_exit_severs_handle() {
        let mut session = Session::new("Shell");
        session.mark_process_started(ProcessId(100));
        session.mark_process_exited();
        assert!(session.process().is_none());
        assert!(!session.is_process_started());
    }
}
