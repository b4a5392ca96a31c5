//! Driven ports (Outbound dependencies)

use crate::domain::{AppliedSnapshot, Snapshot, SnapshotStoreError};

/// Full-state snapshot provider, pulled by the engine for log compaction.
pub trait SnapshotSource: Send + Sync {
    /// Serialize the whole applied state together with the index it reflects.
    fn capture_snapshot(&self) -> Result<AppliedSnapshot, String>;
}

/// Snapshot persistence owned by the engine.
pub trait SnapshotStore: Send + Sync {
    /// Newest available snapshot. `Ok(None)` means none exists, which is a
    /// valid start-from-empty condition.
    fn load(&self) -> Result<Option<Snapshot>, SnapshotStoreError>;

    /// Persist a snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotStoreError>;
}
