//! Commit stream items, membership changes and snapshots.

use serde::{Deserialize, Serialize};
use shared_types::NodeId;

/// One item of the ordered commit stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitEntry {
    /// A committed proposal payload at its log position.
    Committed { index: u64, payload: Vec<u8> },
    /// Historical replay has caught up; check for a pending snapshot.
    Barrier,
}

impl CommitEntry {
    pub fn committed(index: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self::Committed {
            index,
            payload: payload.into(),
        }
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self, Self::Barrier)
    }
}

/// Kind of membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipChangeKind {
    AddNode,
    RemoveNode,
}

/// A request to add or remove a node from the replicated group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipChange {
    pub kind: MembershipChangeKind,
    pub node_id: NodeId,
    /// Opaque context; for `AddNode` this is the node's advertise address.
    pub context: Vec<u8>,
}

impl MembershipChange {
    pub fn add_node(node_id: NodeId, context: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: MembershipChangeKind::AddNode,
            node_id,
            context: context.into(),
        }
    }

    pub fn remove_node(node_id: NodeId) -> Self {
        Self {
            kind: MembershipChangeKind::RemoveNode,
            node_id,
            context: Vec::new(),
        }
    }
}

/// Engine-owned position markers framed around a snapshot payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Index of the last commit included in the snapshot.
    pub index: u64,
    /// Term under which that commit was made.
    pub term: u64,
}

/// A persisted snapshot: metadata plus the store's opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub data: Vec<u8>,
}

/// What the store hands back when the engine asks for a snapshot.
///
/// `applied_index` and `data` are read under the same lock, so the index
/// describes exactly the state in `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSnapshot {
    pub applied_index: u64,
    pub data: Vec<u8>,
}
