//! Domain types of the replication port.

pub mod config;
pub mod entries;
pub mod error;

pub use config::EngineConfig;
pub use entries::{
    AppliedSnapshot, CommitEntry, MembershipChange, MembershipChangeKind, Snapshot,
    SnapshotMetadata,
};
pub use error::{ReplicationError, SnapshotStoreError};
