//! Store commands and change reporting
//!
//! Every mutation of the store can be expressed as a [`Command`]. Applying one
//! yields a [`ChangeSet`] naming what changed, so observers only refresh the
//! views that depend on it.

use capture_types::{Direction, FrameId, RequestId, Timestamp, WebSocketFrame};
use serde::{Deserialize, Serialize};

/// A mutation of the capture store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// Register a connection (no-op when it already exists)
    CreateConnection {
        id: RequestId,
        url: Option<String>,
    },
    /// Record a message on a connection
    AppendFrame {
        connection: RequestId,
        direction: Direction,
        timestamp: Timestamp,
        message: WebSocketFrame,
    },
    SelectConnection {
        id: RequestId,
    },
    SelectFrame {
        id: Option<FrameId>,
    },
    /// Drop all frames of the active connection
    ClearFrames,
    /// Store a new search string
    Search {
        query: String,
    },
}

/// One observable part of the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum StoreChange {
    /// The connection list
    ConnectionsChanged,
    ActiveConnectionChanged,
    ActiveFrameChanged { connection: RequestId },
    FramesChanged { connection: RequestId },
    IndexChanged { connection: RequestId },
    SearchValueChanged,
}

/// Ordered, duplicate-free list of changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    changes: Vec<StoreChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change; duplicates are dropped
    pub fn push(&mut self, change: StoreChange) {
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    /// Add every change of `other`
    pub fn merge(&mut self, other: ChangeSet) {
        for change in other.changes {
            self.push(change);
        }
    }

    pub fn contains(&self, change: &StoreChange) -> bool {
        self.changes.contains(change)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoreChange> {
        self.changes.iter()
    }
}

impl From<StoreChange> for ChangeSet {
    fn from(change: StoreChange) -> Self {
        Self {
            changes: vec![change],
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = StoreChange;
    type IntoIter = std::vec::IntoIter<StoreChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_change_set_dedup() {
        let mut changes = ChangeSet::new();
        assert!(changes.is_empty());

        changes.push(StoreChange::ConnectionsChanged);
        changes.push(StoreChange::FramesChanged {
            connection: "c1".into(),
        });
        changes.push(StoreChange::ConnectionsChanged);

        assert_eq!(changes.len(), 2);
        assert!(changes.contains(&StoreChange::ConnectionsChanged));
        assert!(!changes.contains(&StoreChange::FramesChanged {
            connection: "c2".into()
        }));
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = ChangeSet::from(StoreChange::SearchValueChanged);
        let mut second = ChangeSet::from(StoreChange::ActiveConnectionChanged);
        second.push(StoreChange::SearchValueChanged);

        first.merge(second);
        let changes: Vec<StoreChange> = first.into_iter().collect();
        assert_eq!(
            changes,
            vec![
                StoreChange::SearchValueChanged,
                StoreChange::ActiveConnectionChanged
            ]
        );
    }

    #[test]
    fn test_command_json() {
        let command: Command = serde_json::from_value(json!({
            "command": "selectFrame",
            "id": 7
        }))
        .unwrap();
        assert_eq!(command, Command::SelectFrame { id: Some(7) });

        let value = serde_json::to_value(Command::ClearFrames).unwrap();
        assert_eq!(value, json!({ "command": "clearFrames" }));
    }
}
