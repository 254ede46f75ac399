//! Identifier and status types for sessions, groups, and layouts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a terminal session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a session group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Create a new random group ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attention state of a terminal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    /// No live process behind the slot
    Idle,
    /// Process alive and working (or sitting at a prompt)
    Running,
    /// Process appears blocked on user input
    Waiting,
    /// Process exited abnormally; sticky until the slot is respawned
    Error,
}

impl SessionStatus {
    /// Human-readable label for status badges.
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Waiting => "waiting for input",
            SessionStatus::Error => "process exited",
        }
    }
}

/// Layout mode for arranging visible panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// One pane filling the container
    Single,
    /// Two equal columns
    SideBySide,
    /// Two-column grid, up to four panes
    Grid,
}

impl LayoutMode {
    /// Maximum number of panes this mode can show.
    pub fn max_panes(&self) -> usize {
        match self {
            LayoutMode::Single => 1,
            LayoutMode::SideBySide => 2,
            LayoutMode::Grid => 4,
        }
    }

    /// Layout mode derived from a member count: 0-1 single, 2 side-by-side,
    /// 3+ grid.
    pub fn for_count(count: usize) -> Self {
        match count {
            0 | 1 => LayoutMode::Single,
            2 => LayoutMode::SideBySide,
            _ => LayoutMode::Grid,
        }
    }
}

impl Default for LayoutMode {
    fn default() -> Self {
        LayoutMode::Single
    }
}
