use rc_01_replication::{ReplicationError, SnapshotStoreError};
use thiserror::Error;

/// Errors returned to callers of the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error(transparent)]
    Replication(#[from] ReplicationError),
}

/// Terminal failures of the apply loop.
///
/// Every variant means the node can no longer trust its applied state.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Undecodable commit at index {index}: {reason}")]
    Decode { index: u64, reason: String },

    #[error("Failed to load snapshot: {0}")]
    SnapshotLoad(#[from] SnapshotStoreError),

    #[error("Corrupt snapshot at term {term} index {index}: {reason}")]
    CorruptSnapshot { term: u64, index: u64, reason: String },

    #[error("Snapshot storage was never delivered by the engine")]
    SnapshotStorageMissing,

    #[error("Commit stream closed")]
    CommitStreamClosed,

    #[error("Fatal signal: {0}")]
    Fatal(String),
}
