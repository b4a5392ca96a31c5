//! Ports of the replication engine.
//!
//! - `inbound`: driving port, what the node submits to the engine
//! - `outbound`: driven ports, what the engine needs from the node

pub mod inbound;
pub mod outbound;

pub use inbound::ProposalIntake;
pub use outbound::{SnapshotSource, SnapshotStore};
