//! Ports of the chat store.
//!
//! The proposal side reuses `rc_01_replication::ProposalIntake`; the only
//! port owned here is where applied events go next.

pub mod outbound;

pub use outbound::CommitObserver;
