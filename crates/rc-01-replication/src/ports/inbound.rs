//! Driving port (Inbound API)

use crate::domain::{MembershipChange, ReplicationError};
use async_trait::async_trait;

/// Intake for proposals and membership changes.
///
/// Acceptance into the intake says nothing about whether the payload will
/// ever commit. Both calls may wait while the engine applies backpressure.
#[async_trait]
pub trait ProposalIntake: Send + Sync {
    /// Submit an opaque payload for total ordering.
    async fn propose(&self, payload: Vec<u8>) -> Result<(), ReplicationError>;

    /// Submit a membership change request.
    async fn change_membership(&self, change: MembershipChange) -> Result<(), ReplicationError>;
}
