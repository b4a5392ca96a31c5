//! Snapshot store adapters.

pub mod file_snapshots;
pub mod memory_snapshots;

pub use file_snapshots::FileSnapshotStore;
pub use memory_snapshots::MemorySnapshotStore;
