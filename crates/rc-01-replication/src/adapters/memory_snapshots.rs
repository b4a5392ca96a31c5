//! In-memory snapshot store.
//!
//! Keeps only the newest snapshot. Used by tests and by nodes started
//! without a data directory.

use crate::domain::{Snapshot, SnapshotStoreError};
use crate::ports::SnapshotStore;
use parking_lot::RwLock;

#[derive(Default)]
pub struct MemorySnapshotStore {
    latest: RwLock<Option<Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            latest: RwLock::new(Some(snapshot)),
        }
    }

    pub fn latest_index(&self) -> Option<u64> {
        self.latest.read().as_ref().map(|s| s.metadata.index)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, SnapshotStoreError> {
        Ok(self.latest.read().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotStoreError> {
        let mut latest = self.latest.write();
        let newer = latest
            .as_ref()
            .map_or(true, |current| snapshot.metadata.index >= current.metadata.index);
        if newer {
            *latest = Some(snapshot.clone());
        }
        Ok(())
    }
}
