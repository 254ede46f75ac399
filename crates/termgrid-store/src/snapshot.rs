//! Persistence snapshot for the session store.
//!
//! The schema is strict and validated field-by-field on restore: a
//! corrupt document is a full no-op, while corrupt *inner* entries (bad
//! group indices, out-of-range selection) are dropped entry-wise and the
//! rest of the restore proceeds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use termgrid_core::{LayoutMode, Result, SessionId};

use crate::store::SessionStore;

/// Serialized form of the store, as handed to the external key-value
/// store. Field names and encodings are part of the on-disk contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Session names; order is the canonical session order
    pub session_names: Vec<String>,
    /// Index into `session_names`, or null for no selection
    pub selected_index: Option<i64>,
    /// Group membership expressed as indices into `session_names`
    pub groups: Vec<GroupSnapshot>,
    /// Picker layout mode
    pub layout: LayoutMode,
    /// Terminal font size in points
    pub font_size: f32,
}

/// One group in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    /// Group display name
    pub name: String,
    /// Ordered member indices into `session_names`
    pub session_indices: Vec<i64>,
}

impl StoreSnapshot {
    /// Decode a snapshot from JSON. Any structural failure rejects the
    /// whole document; the caller treats that as a restore no-op.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| termgrid_core::Error::SnapshotDecode(e.to_string()))
    }

    /// Encode the snapshot as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl SessionStore {
    /// Capture the persistable subset of store state.
    ///
    /// Sessions are referenced by name and position; process handles and
    /// statuses are runtime-only and never persisted.
    pub fn snapshot(&self) -> StoreSnapshot {
        let index_of = |id: SessionId| -> Option<i64> {
            self.sessions()
                .iter()
                .position(|s| s.id() == id)
                .map(|i| i as i64)
        };

        StoreSnapshot {
            session_names: self
                .sessions()
                .iter()
                .map(|s| s.name().to_string())
                .collect(),
            selected_index: self.selected_id().and_then(index_of),
            groups: self
                .groups()
                .iter()
                .map(|group| GroupSnapshot {
                    name: group.name().to_string(),
                    session_indices: group
                        .session_ids()
                        .iter()
                        .filter_map(|&id| index_of(id))
                        .collect(),
                })
                .collect(),
            layout: self.picker_layout(),
            font_size: self.font_size(),
        }
    }

    /// Replace store state from a snapshot.
    ///
    /// Sessions are recreated by name in order; each creation selects the
    /// new session, so the final selection is the last created unless a
    /// valid `selected_index` overrides it. Groups that resolve to fewer
    /// than 2 valid members are silently discarded, as are indices that
    /// are out of range or already claimed by an earlier group.
    pub fn restore(&mut self, snapshot: &StoreSnapshot) {
        *self = SessionStore::new();

        let mut ids: Vec<SessionId> = Vec::with_capacity(snapshot.session_names.len());
        for name in &snapshot.session_names {
            ids.push(self.create_session(name.clone()));
        }

        let mut claimed: Vec<SessionId> = Vec::new();
        for group in &snapshot.groups {
            let members: Vec<SessionId> = group
                .session_indices
                .iter()
                .filter_map(|&idx| usize::try_from(idx).ok())
                .filter_map(|idx| ids.get(idx).copied())
                .filter(|id| {
                    if claimed.contains(id) {
                        return false;
                    }
                    claimed.push(*id);
                    true
                })
                .collect();

            if members.len() >= 2 {
                self.create_group(group.name.clone(), &members);
            } else {
                warn!(group = group.name, "discarding restored group with < 2 valid members");
            }
        }

        // A null or out-of-range index leaves whatever the creation loop
        // last selected
        if let Some(idx) = snapshot.selected_index {
            if let Some(&id) = usize::try_from(idx).ok().and_then(|i| ids.get(i)) {
                self.select_session(id);
            } else {
                warn!(index = idx, "ignoring out-of-range selected index");
            }
        }

        self.set_picker_layout(snapshot.layout);
        self.set_font_size(snapshot.font_size);

        debug!(
            sessions = self.len(),
            groups = self.groups().len(),
            "store restored from snapshot"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_json_field_names() {
        let mut store = SessionStore::new();
        store.create_session("Alpha");
        store.set_picker_layout(LayoutMode::SideBySide);

        let json = store.snapshot().to_json().unwrap();
        assert!(json.contains("\"sessionNames\""));
        assert!(json.contains("\"selectedIndex\""));
        assert!(json.contains("\"fontSize\""));
        assert!(json.contains("\"sideBySide\""));
    }

    #[test]
    fn test_corrupt_document_rejected_whole() {
        assert!(StoreSnapshot::from_json("not json").is_err());
        assert!(StoreSnapshot::from_json("{\"sessionNames\": 42}").is_err());
    }

    #[test]
    fn test_round_trip_empty_store() {
        let store = SessionStore::new();
        let json = store.snapshot().to_json().unwrap();

        let mut restored = SessionStore::new();
        restored.restore(&StoreSnapshot::from_json(&json).unwrap());

        assert!(restored.is_empty());
        assert_eq!(restored.selected_id(), None);
    }

    #[test]
    fn test_round_trip_sessions_and_selection() {
        let mut store = SessionStore::new();
        let s1 = store.create_session("Alpha");
        store.create_session("Beta");
        store.set_picker_layout(LayoutMode::SideBySide);
        store.set_font_size(16.0);
        store.select_session(s1);

        let json = store.snapshot().to_json().unwrap();
        let mut restored = SessionStore::new();
        restored.restore(&StoreSnapshot::from_json(&json).unwrap());

        assert_eq!(restored.len(), 2);
        let names: Vec<_> = restored.sessions().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["Alpha", "Beta"]);
        assert_eq!(restored.picker_layout(), LayoutMode::SideBySide);
        assert_eq!(restored.font_size(), 16.0);
        assert_eq!(
            restored.selected_id(),
            Some(restored.sessions()[0].id())
        );
    }

    #[test]
    fn test_round_trip_groups_preserve_membership_order() {
        let mut store = SessionStore::new();
        let a = store.create_session("A");
        let b = store.create_session("B");
        store.create_session("C");
        store.create_group("MyGrid", &[b, a]);

        let json = store.snapshot().to_json().unwrap();
        let mut restored = SessionStore::new();
        restored.restore(&StoreSnapshot::from_json(&json).unwrap());

        assert_eq!(restored.len(), 3);
        assert_eq!(restored.groups().len(), 1);
        let group = &restored.groups()[0];
        assert_eq!(group.name(), "MyGrid");

        let member_names: Vec<_> = group
            .session_ids()
            .iter()
            .map(|&id| restored.session(id).unwrap().name())
            .collect();
        assert_eq!(member_names, ["B", "A"]);
    }

    #[test]
    fn test_restore_drops_out_of_range_group_indices() {
        let snapshot = StoreSnapshot {
            session_names: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            selected_index: Some(0),
            groups: vec![GroupSnapshot {
                name: "G".to_string(),
                session_indices: vec![0, 99, 2, -1],
            }],
            layout: LayoutMode::Grid,
            font_size: 13.0,
        };

        let mut store = SessionStore::new();
        store.restore(&snapshot);

        // 99 and -1 dropped; {A, C} still has 2 valid members
        assert_eq!(store.groups().len(), 1);
        let member_names: Vec<_> = store.groups()[0]
            .session_ids()
            .iter()
            .map(|&id| store.session(id).unwrap().name())
            .collect();
        assert_eq!(member_names, ["A", "C"]);
    }

    #[test]
    fn test_restore_discards_group_under_two_valid_members() {
        let snapshot = StoreSnapshot {
            session_names: vec!["A".to_string(), "B".to_string()],
            selected_index: None,
            groups: vec![GroupSnapshot {
                name: "G".to_string(),
                session_indices: vec![1, 7],
            }],
            layout: LayoutMode::Single,
            font_size: 13.0,
        };

        let mut store = SessionStore::new();
        store.restore(&snapshot);

        assert_eq!(store.len(), 2);
        assert!(store.groups().is_empty());
    }

    #[test]
    fn test_restore_deduplicates_group_indices() {
        let snapshot = StoreSnapshot {
            session_names: vec!["A".to_string(), "B".to_string()],
            selected_index: None,
            groups: vec![GroupSnapshot {
                name: "G".to_string(),
                session_indices: vec![0, 0, 1],
            }],
            layout: LayoutMode::Single,
            font_size: 13.0,
        };

        let mut store = SessionStore::new();
        store.restore(&snapshot);

        assert_eq!(store.groups().len(), 1);
        assert_eq!(store.groups()[0].len(), 2);
    }

    #[test]
    fn test_restore_keeps_membership_disjoint_across_groups() {
        let snapshot = StoreSnapshot {
            session_names: (0..4).map(|i| format!("S{i}")).collect(),
            selected_index: None,
            groups: vec![
                GroupSnapshot {
                    name: "One".to_string(),
                    session_indices: vec![0, 1],
                },
                GroupSnapshot {
                    name: "Two".to_string(),
                    // index 0 is already claimed by "One"; dropped here
                    session_indices: vec![0, 2, 3],
                },
            ],
            layout: LayoutMode::Single,
            font_size: 13.0,
        };

        let mut store = SessionStore::new();
        store.restore(&snapshot);

        assert_eq!(store.groups().len(), 2);
        assert_eq!(store.groups()[0].len(), 2);
        assert_eq!(store.groups()[1].len(), 2);
    }

    #[test]
    fn test_restore_selected_index_overrides_creation_order() {
        let snapshot = StoreSnapshot {
            session_names: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            selected_index: Some(1),
            groups: vec![],
            layout: LayoutMode::Single,
            font_size: 13.0,
        };

        let mut store = SessionStore::new();
        store.restore(&snapshot);
        assert_eq!(store.selected_session().unwrap().name(), "B");
    }

    #[test]
    fn test_negative_selected_index_ignored() {
        let snapshot = StoreSnapshot {
            session_names: vec!["A".to_string(), "B".to_string()],
            selected_index: Some(-3),
            groups: vec![],
            layout: LayoutMode::Single,
            font_size: 13.0,
        };

        let mut store = SessionStore::new();
        store.restore(&snapshot);

        // Creation loop selected the last session; the bad index is ignored
        assert_eq!(store.selected_session().unwrap().name(), "B");
    }
}
