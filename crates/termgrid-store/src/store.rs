//! The session store: owns all sessions and groups, plus the derived
//! visible set and effective layout.
//!
//! All mutations are expected to run on a single owning context (the
//! host's event loop); the store itself holds no locks and performs no
//! I/O. Operations on unknown identifiers are absorbed as no-ops, never
//! errors, since UI actions can race with concurrent removal.

use tracing::{debug, info};

use termgrid_core::{
    AppearanceSettings, GroupId, LayoutMode, ProcessId, SessionId, FONT_SIZE_MAX, FONT_SIZE_MIN,
};

use crate::group::Group;
use crate::session::Session;

/// Aggregate state for the multi-pane host.
#[derive(Debug)]
pub struct SessionStore {
    /// Insertion order is the canonical tab order
    sessions: Vec<Session>,
    groups: Vec<Group>,
    selected_id: Option<SessionId>,
    /// Layout chosen for ungrouped sessions; groups derive their own
    picker_layout: LayoutMode,
    font_size: f32,
}

impl SessionStore {
    /// Create an empty store with default appearance.
    pub fn new() -> Self {
        Self::with_appearance(&AppearanceSettings::default())
    }

    /// Create an empty store seeded from appearance settings.
    pub fn with_appearance(appearance: &AppearanceSettings) -> Self {
        Self {
            sessions: Vec::new(),
            groups: Vec::new(),
            selected_id: None,
            picker_layout: appearance.layout,
            font_size: appearance.font_size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX),
        }
    }

    // --- Accessors -----------------------------------------------------

    /// All sessions in canonical tab order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// All live groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Look up a session by id.
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    /// Mutable session lookup. Callers run on the owning context; the
    /// attention detector uses this to apply status transitions.
    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id() == id)
    }

    /// Resolve an engine process handle back to its session.
    pub fn session_id_for_process(&self, handle: ProcessId) -> Option<SessionId> {
        self.sessions
            .iter()
            .find(|s| s.process() == Some(handle))
            .map(Session::id)
    }

    /// Currently selected session id, if any.
    pub fn selected_id(&self) -> Option<SessionId> {
        self.selected_id
    }

    /// Currently selected session, if any.
    pub fn selected_session(&self) -> Option<&Session> {
        self.selected_id.and_then(|id| self.session(id))
    }

    /// The group containing the selected session, if any.
    pub fn active_group(&self) -> Option<&Group> {
        self.selected_id.and_then(|id| self.group_for_session(id))
    }

    /// The group containing a session, if any. Membership across groups
    /// is disjoint, so there is at most one.
    pub fn group_for_session(&self, id: SessionId) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(id))
    }

    /// Look up a group by id.
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id() == id)
    }

    /// Sessions not belonging to any group, in tab order.
    pub fn ungrouped_sessions(&self) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| self.group_for_session(s.id()).is_none())
            .collect()
    }

    /// Number of sessions currently waiting for input.
    pub fn waiting_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.status() == termgrid_core::SessionStatus::Waiting)
            .count()
    }

    /// Layout mode chosen for ungrouped sessions.
    pub fn picker_layout(&self) -> LayoutMode {
        self.picker_layout
    }

    /// Set the picker layout. Grouped sessions are unaffected; their
    /// layout is derived from member count.
    pub fn set_picker_layout(&mut self, layout: LayoutMode) {
        self.picker_layout = layout;
    }

    /// Terminal font size in points.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Set the font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
    }

    /// Adjust the font size by a delta, clamped to the supported range.
    pub fn adjust_font_size(&mut self, delta: f32) {
        self.set_font_size(self.font_size + delta);
    }

    // --- Session CRUD --------------------------------------------------

    /// Append a new idle session and select it.
    pub fn create_session(&mut self, name: impl Into<String>) -> SessionId {
        let session = Session::new(name);
        let id = session.id();
        info!(session = %id, name = session.name(), "session created");
        self.sessions.push(session);
        self.selected_id = Some(id);
        id
    }

    /// Remove a session: severs its group membership, dissolves any group
    /// left under 2 members, and repairs the selection. The engine's
    /// process is not killed here; the store only observes processes.
    pub fn remove_session(&mut self, id: SessionId) {
        let Some(pos) = self.sessions.iter().position(|s| s.id() == id) else {
            return;
        };

        let mut session = self.sessions.remove(pos);
        session.clear_process();
        info!(session = %id, "session removed");

        for group in &mut self.groups {
            group.session_ids_mut().retain(|&member| member != id);
        }
        self.dissolve_undersized_groups();

        if self.selected_id == Some(id) {
            self.selected_id = self.sessions.first().map(Session::id);
        }
    }

    /// Select a session. Unknown ids are a no-op.
    pub fn select_session(&mut self, id: SessionId) {
        if self.session(id).is_some() {
            self.selected_id = Some(id);
        }
    }

    /// Select a session by tab index. Out-of-range indices are a no-op.
    pub fn select_session_by_index(&mut self, index: usize) {
        if let Some(session) = self.sessions.get(index) {
            self.selected_id = Some(session.id());
        }
    }

    // --- Group management ----------------------------------------------

    /// Form a new group from the listed sessions, stealing each from any
    /// group it currently belongs to.
    ///
    /// Unknown ids and duplicates are dropped. If fewer than 2 members
    /// remain the group is returned for the caller's convenience but not
    /// retained; a sub-2 group must not exist in the store.
    pub fn create_group(&mut self, name: impl Into<String>, session_ids: &[SessionId]) -> Group {
        let mut members: Vec<SessionId> = Vec::new();
        for &id in session_ids {
            if self.session(id).is_some() && !members.contains(&id) {
                members.push(id);
            }
        }

        for &id in &members {
            self.remove_from_group(id);
        }

        let group = Group::new(name, members);
        if group.len() >= 2 {
            debug!(group = %group.id(), members = group.len(), "group created");
            self.groups.push(group.clone());
        }
        group
    }

    /// Append a session to a group's ordered member list.
    ///
    /// Idempotent for existing members. Otherwise the session is stolen
    /// from any other group (dissolving that group if it drops below 2).
    pub fn add_to_group(&mut self, group_id: GroupId, session_id: SessionId) {
        if self.session(session_id).is_none() {
            return;
        }
        let Some(group) = self.group(group_id) else {
            return;
        };
        if group.contains(session_id) {
            return;
        }

        self.remove_from_group(session_id);

        // Re-resolve: dissolving the donor group shifted the vec
        if let Some(group) = self.groups.iter_mut().find(|g| g.id() == group_id) {
            group.session_ids_mut().push(session_id);
        }
    }

    /// Delete a session from whichever group contains it; dissolves that
    /// group if it drops below 2 members.
    pub fn remove_from_group(&mut self, session_id: SessionId) {
        for group in &mut self.groups {
            group.session_ids_mut().retain(|&id| id != session_id);
        }
        self.dissolve_undersized_groups();
    }

    /// Drag-and-drop: reorder within a group, pull into an existing
    /// group, or form a new 2-member group.
    pub fn drop_session(&mut self, dragged_id: SessionId, target_id: SessionId) {
        if dragged_id == target_id {
            return;
        }
        if self.session(dragged_id).is_none() || self.session(target_id).is_none() {
            return;
        }

        let dragged_group = self.group_for_session(dragged_id).map(Group::id);
        let target_group = self.group_for_session(target_id).map(Group::id);

        // Reorder within the same group: a forward move lands just after
        // the target, a backward move just before it
        if let (Some(dg), Some(tg)) = (dragged_group, target_group) {
            if dg == tg {
                let Some(group) = self.groups.iter_mut().find(|g| g.id() == tg) else {
                    return;
                };
                let ids = group.session_ids_mut();
                let (Some(from), Some(to)) = (
                    ids.iter().position(|&id| id == dragged_id),
                    ids.iter().position(|&id| id == target_id),
                ) else {
                    return;
                };
                ids.remove(from);
                ids.insert(to, dragged_id);
                return;
            }
        }

        match target_group {
            Some(group_id) => self.add_to_group(group_id, dragged_id),
            None => {
                self.create_group("Grid", &[target_id, dragged_id]);
            }
        }
    }

    /// Group the currently selected session with another session,
    /// preserving the selection across the operation.
    pub fn group_selected_with(&mut self, other_id: SessionId) {
        let Some(selected_id) = self.selected_id else {
            return;
        };
        if selected_id == other_id {
            return;
        }
        self.drop_session(other_id, selected_id);
        self.select_session(selected_id);
    }

    fn dissolve_undersized_groups(&mut self) {
        self.groups.retain(|group| {
            let keep = group.len() >= 2;
            if !keep {
                debug!(group = %group.id(), members = group.len(), "group dissolved");
            }
            keep
        });
    }

    // --- Derivations ---------------------------------------------------

    /// The ordered subset of sessions currently shown in the grid.
    ///
    /// Grouped selection: the group's member list truncated to its layout
    /// capacity, in group order. Selection never reorders a group.
    ///
    /// Ungrouped: a stable window of the first `picker_layout` capacity
    /// ungrouped sessions. A selected session outside the window is
    /// swapped into the *last* slot, so in-window selection changes never
    /// reshuffle the grid and distant selections surface without moving
    /// the other panes.
    pub fn visible_sessions(&self) -> Vec<&Session> {
        if let Some(group) = self.active_group() {
            let capacity = group.layout_mode().max_panes();
            return group
                .session_ids()
                .iter()
                .take(capacity)
                .filter_map(|&id| self.session(id))
                .collect();
        }

        let ungrouped = self.ungrouped_sessions();
        let capacity = self.picker_layout.max_panes();
        let mut window: Vec<&Session> = ungrouped.iter().take(capacity).copied().collect();

        if let Some(selected) = self.selected_session() {
            let in_window = window.iter().any(|s| s.id() == selected.id());
            let is_ungrouped = ungrouped.iter().any(|s| s.id() == selected.id());
            if !in_window && is_ungrouped {
                if let Some(last) = window.last_mut() {
                    *last = selected;
                }
            }
        }

        window
    }

    /// The layout mode actually applied, after group derivation and
    /// capping by the ungrouped-session count.
    pub fn effective_layout(&self) -> LayoutMode {
        if let Some(group) = self.active_group() {
            return group.layout_mode();
        }

        let count = self.ungrouped_sessions().len();
        if count <= 1 {
            return LayoutMode::Single;
        }
        if count == 2 && self.picker_layout == LayoutMode::Grid {
            return LayoutMode::SideBySide;
        }
        self.picker_layout
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
