//! # rc-01-replication
//!
//! Replication engine port for the chat log.
//!
//! ## Architecture
//!
//! The consensus engine is an external collaborator. The rest of the
//! workspace only sees it through the types in this crate:
//!
//! ```text
//!  API Gateway ──propose()────────────┐
//!              ──change_membership()──┤
//!                                     ▼
//!                           ┌───────────────────┐
//!                           │ Replication Engine│──capture_snapshot()──→ Chat Store
//!                           └─────────┬─────────┘
//!                                     │ CommitEntry::{Committed, Barrier}
//!                                     ▼
//!                                 Chat Store (apply loop)
//! ```
//!
//! - [`ports::ProposalIntake`]: where proposals and membership changes go.
//! - [`domain::CommitEntry`]: the ordered commit stream.
//! - [`ports::SnapshotStore`]: snapshot persistence, handed to the store once
//!   at startup through [`EngineChannels::snapshot_ready`].
//! - [`ports::SnapshotSource`]: the engine pulls full-state snapshots from the
//!   store at its own cadence.
//! - [`FatalSignal`]: terminal, broadcast to every subsystem.
//!
//! [`LoopbackEngine`] is a single-node, in-process engine that satisfies the
//! port. It gives a total order trivially (intake order) and is what the node
//! runtime and the integration tests drive.

pub mod adapters;
pub mod domain;
pub mod loopback;
pub mod ports;
pub mod signal;

pub use adapters::{FileSnapshotStore, MemorySnapshotStore};
pub use domain::{
    AppliedSnapshot, CommitEntry, EngineConfig, MembershipChange, MembershipChangeKind,
    ReplicationError, Snapshot, SnapshotMetadata, SnapshotStoreError,
};
pub use loopback::{EngineChannels, EngineHandle, LoopbackEngine};
pub use ports::{ProposalIntake, SnapshotSource, SnapshotStore};
pub use signal::{FatalSignal, FatalWatcher};
