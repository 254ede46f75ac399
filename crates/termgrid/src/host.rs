//! The host event loop.
//!
//! All store mutation happens on one tokio task that owns the
//! [`SessionStore`] and [`AttentionDetector`]. UI commands and marshaled
//! engine callbacks arrive as [`HostEvent`]s over an unbounded channel,
//! multiplexed with a periodic detection tick. Nothing else holds a
//! reference to the store, so no mutation ever races.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use termgrid_core::{
    EngineEvent, GroupId, HostConfig, LayoutMode, Rect, SessionId, SessionStatus, Size,
    TerminalEngine,
};
use termgrid_detector::AttentionDetector;
use termgrid_store::{SessionStore, StoreSnapshot};

/// A UI-originated command against the store.
#[derive(Debug, Clone)]
pub enum HostCommand {
    /// Create a session with the given name and spawn a shell for it
    CreateSession {
        /// Display name for the new session
        name: String,
    },
    /// Remove a session
    RemoveSession {
        /// Session to remove
        id: SessionId,
    },
    /// Select a session by id
    Select {
        /// Session to select
        id: SessionId,
    },
    /// Select a session by its position in creation order
    SelectIndex {
        /// Zero-based index into the session list
        index: usize,
    },
    /// Create a named group from a set of sessions
    CreateGroup {
        /// Group display name
        name: String,
        /// Sessions to place in the group
        session_ids: Vec<SessionId>,
    },
    /// Add a session to an existing group
    AddToGroup {
        /// Target group
        group_id: GroupId,
        /// Session to add
        session_id: SessionId,
    },
    /// Remove a session from whatever group holds it
    RemoveFromGroup {
        /// Session to remove from its group
        session_id: SessionId,
    },
    /// Drag-and-drop a session onto another
    DropSession {
        /// Session being dragged
        dragged_id: SessionId,
        /// Session it was dropped onto
        target_id: SessionId,
    },
    /// Group the selected session with another
    GroupSelectedWith {
        /// The other session
        other_id: SessionId,
    },
    /// Set the picker layout for ungrouped viewing
    SetLayout {
        /// Requested layout mode
        layout: LayoutMode,
    },
    /// Set the terminal font size
    SetFontSize {
        /// Requested size in points, clamped to the permitted range
        size: f32,
    },
    /// Adjust the terminal font size by a delta
    AdjustFontSize {
        /// Point delta, positive or negative
        delta: f32,
    },
    /// Start renaming a session; title changes are held off until finished
    BeginRename {
        /// Session being renamed
        id: SessionId,
    },
    /// Finish renaming a session, optionally committing a new name
    FinishRename {
        /// Session being renamed
        id: SessionId,
        /// New name, or `None` to keep the current one
        name: Option<String>,
    },
    /// Send input bytes to a session's shell process
    SendInput {
        /// Target session
        id: SessionId,
        /// Raw input bytes
        bytes: Vec<u8>,
    },
    /// Persist the current store snapshot to disk
    Save,
    /// Save and stop the event loop
    Shutdown,
}

/// Anything the host event loop reacts to.
#[derive(Debug)]
pub enum HostEvent {
    /// A UI command
    Command(HostCommand),
    /// A marshaled engine callback
    Engine(EngineEvent),
}

/// The single owning context for session state.
pub struct Host {
    store: SessionStore,
    detector: AttentionDetector,
    engine: Arc<dyn TerminalEngine>,
    config: HostConfig,
    snapshot_path: Option<PathBuf>,
}

impl Host {
    /// Create a host around an engine, restoring from the snapshot file
    /// if one exists and decodes.
    pub fn new<E>(engine: Arc<E>, config: HostConfig, snapshot_path: Option<PathBuf>) -> Self
    where
        E: TerminalEngine + 'static,
    {
        let detector = AttentionDetector::with_settings(engine.clone(), &config.detection);
        let mut host = Self {
            store: SessionStore::with_appearance(&config.appearance),
            detector,
            engine,
            config,
            snapshot_path,
        };
        host.load();
        host
    }

    /// Read access to session state, for rendering.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Pane rectangles for the current visible set inside a container.
    ///
    /// Index-aligned with the store's visible sessions.
    pub fn pane_rects(&self, container: Size) -> Vec<Rect> {
        termgrid_layout::rects_for(
            self.store.visible_sessions().len(),
            self.store.effective_layout(),
            container,
        )
    }

    /// Apply one UI command.
    pub fn apply(&mut self, command: HostCommand) {
        match command {
            HostCommand::CreateSession { name } => self.create_session(name),
            HostCommand::RemoveSession { id } => self.store.remove_session(id),
            HostCommand::Select { id } => self.store.select_session(id),
            HostCommand::SelectIndex { index } => self.store.select_session_by_index(index),
            HostCommand::CreateGroup { name, session_ids } => {
                self.store.create_group(name, &session_ids);
            }
            HostCommand::AddToGroup {
                group_id,
                session_id,
            } => self.store.add_to_group(group_id, session_id),
            HostCommand::RemoveFromGroup { session_id } => {
                self.store.remove_from_group(session_id);
            }
            HostCommand::DropSession {
                dragged_id,
                target_id,
            } => self.store.drop_session(dragged_id, target_id),
            HostCommand::GroupSelectedWith { other_id } => {
                self.store.group_selected_with(other_id);
            }
            HostCommand::SetLayout { layout } => self.store.set_picker_layout(layout),
            HostCommand::SetFontSize { size } => self.store.set_font_size(size),
            HostCommand::AdjustFontSize { delta } => self.store.adjust_font_size(delta),
            HostCommand::BeginRename { id } => {
                if let Some(session) = self.store.session_mut(id) {
                    session.begin_rename();
                }
            }
            HostCommand::FinishRename { id, name } => {
                if let Some(session) = self.store.session_mut(id) {
                    if let Some(name) = name {
                        session.set_name(name);
                    }
                    session.finish_rename();
                }
            }
            HostCommand::SendInput { id, bytes } => self.send_input(id, &bytes),
            HostCommand::Save => self.save(),
            // Shutdown is consumed by the run loop before apply
            HostCommand::Shutdown => {}
        }
    }

    /// Apply one marshaled engine callback.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::OutputLine { handle, line } => {
                let Some(id) = self.store.session_id_for_process(handle) else {
                    debug!("Output for unknown process {}", handle);
                    return;
                };
                self.detector.on_output_line(&mut self.store, id, &line);
            }
            EngineEvent::ProcessExit { handle, exit_code } => {
                let Some(id) = self.store.session_id_for_process(handle) else {
                    debug!("Exit for unknown process {}", handle);
                    return;
                };
                self.detector.on_process_exit(&mut self.store, id, exit_code);
            }
            EngineEvent::TitleChange { handle, title } => {
                let Some(id) = self.store.session_id_for_process(handle) else {
                    debug!("Title change for unknown process {}", handle);
                    return;
                };
                if let Some(session) = self.store.session_mut(id) {
                    session.apply_title(&title);
                }
            }
        }
    }

    /// One periodic detection pass over all sessions.
    pub fn tick(&mut self) {
        self.detector.evaluate_all(&mut self.store);
    }

    fn create_session(&mut self, name: String) {
        let id = self.store.create_session(name);

        let mut env = vec![("TERM".to_string(), self.config.terminal.term.clone())];
        env.extend(self.config.terminal.env.iter().cloned());

        match self.engine.spawn(&self.config.terminal.shell, &env, None) {
            Ok(handle) => {
                if let Some(session) = self.store.session_mut(id) {
                    session.mark_process_started(handle);
                }
                info!("Spawned {} for session {}", handle, id);
            }
            Err(e) => {
                error!("Failed to spawn shell for session {}: {}", id, e);
                if let Some(session) = self.store.session_mut(id) {
                    session.set_status(SessionStatus::Error);
                }
            }
        }
    }

    fn send_input(&mut self, id: SessionId, bytes: &[u8]) {
        let Some(handle) = self.store.session(id).and_then(|s| s.process()) else {
            warn!("Input for session {} with no live process", id);
            return;
        };
        if let Err(e) = self.engine.send_input(handle, bytes) {
            warn!("Failed to send input to {}: {}", handle, e);
        }
    }

    /// Persist the current snapshot. Failures are logged, never fatal.
    pub fn save(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        match self.write_snapshot(path) {
            Ok(()) => debug!("Saved snapshot to {}", path.display()),
            Err(e) => warn!("Failed to save snapshot to {}: {}", path.display(), e),
        }
    }

    fn write_snapshot(&self, path: &Path) -> termgrid_core::Result<()> {
        // The default path lives under ~/.termgrid, which does not exist
        // on a first run
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.store.snapshot().to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Restore from the snapshot file. A missing or corrupt file leaves
    /// the store untouched.
    fn load(&mut self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                warn!("Failed to read snapshot {}: {}", path.display(), e);
                return;
            }
        };
        match StoreSnapshot::from_json(&json) {
            Ok(snapshot) => {
                self.store.restore(&snapshot);
                info!(
                    "Restored {} session(s), {} group(s) from {}",
                    self.store.len(),
                    self.store.groups().len(),
                    path.display()
                );
            }
            Err(e) => warn!("Ignoring corrupt snapshot {}: {}", path.display(), e),
        }
    }

    /// Run the event loop until shutdown or the channel closes.
    ///
    /// The tick interval drives periodic liveness evaluation; missed
    /// ticks are skipped rather than bursted.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<HostEvent>) {
        let mut tick = tokio::time::interval(Duration::from_millis(
            self.config.detection.tick_interval_ms,
        ));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => self.tick(),
                event = events.recv() => match event {
                    Some(HostEvent::Command(HostCommand::Shutdown)) | None => break,
                    Some(HostEvent::Command(command)) => self.apply(command),
                    Some(HostEvent::Engine(engine_event)) => {
                        self.handle_engine_event(engine_event);
                    }
                },
            }
        }

        self.save();
        info!("Host loop stopped");
    }
}
