//! Error types for the replication port.

use std::path::PathBuf;

/// Errors surfaced to callers of the replication port.
#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    #[error("proposal intake closed: replication engine stopped")]
    IntakeClosed,

    #[error("invalid engine configuration: {0}")]
    Config(String),

    #[error("snapshot store error: {0}")]
    Snapshot(#[from] SnapshotStoreError),
}

/// Snapshot persistence failures.
///
/// "No snapshot exists" is not an error; `SnapshotStore::load` returns
/// `Ok(None)` for it.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotStoreError {
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl SnapshotStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
