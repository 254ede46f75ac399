//! Ordered session clusters with a derived layout.

use termgrid_core::{GroupId, LayoutMode, SessionId};

/// An ordered cluster of sessions sharing a tiled layout.
///
/// The layout mode is derived from the member count, never stored.
/// A group with fewer than 2 members is invalid; the store dissolves such
/// groups rather than keeping them.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    name: String,
    session_ids: Vec<SessionId>,
}

impl Group {
    /// Create a group from an ordered member list.
    pub fn new(name: impl Into<String>, session_ids: Vec<SessionId>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            session_ids,
        }
    }

    /// Group identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered member list.
    pub fn session_ids(&self) -> &[SessionId] {
        &self.session_ids
    }

    /// Mutable member list; the store is responsible for dissolving the
    /// group if a mutation drops it below 2 members.
    pub(crate) fn session_ids_mut(&mut self) -> &mut Vec<SessionId> {
        &mut self.session_ids
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.session_ids.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.session_ids.is_empty()
    }

    /// Whether the session belongs to this group.
    pub fn contains(&self, id: SessionId) -> bool {
        self.session_ids.contains(&id)
    }

    /// Layout mode derived from the member count.
    pub fn layout_mode(&self) -> LayoutMode {
        LayoutMode::for_count(self.session_ids.len())
    }
}
