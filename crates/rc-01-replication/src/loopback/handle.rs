//! Client handle of the loopback engine.

use crate::domain::{MembershipChange, ReplicationError};
use crate::ports::ProposalIntake;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::NodeId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Cluster membership as last applied by the engine: node id → address.
pub(crate) type Membership = Arc<RwLock<BTreeMap<NodeId, String>>>;

/// Cloneable intake handle for the loopback engine.
///
/// The engine stops once every handle is dropped.
#[derive(Clone)]
pub struct EngineHandle {
    pub(crate) proposals: mpsc::Sender<Vec<u8>>,
    pub(crate) changes: mpsc::Sender<MembershipChange>,
    pub(crate) membership: Membership,
    pub(crate) commit_index: Arc<AtomicU64>,
}

impl EngineHandle {
    /// Snapshot of the current membership.
    pub fn members(&self) -> BTreeMap<NodeId, String> {
        self.membership.read().clone()
    }

    /// Index of the last entry the engine has committed.
    pub fn commit_index(&self) -> u64 {
        self.commit_index.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ProposalIntake for EngineHandle {
    async fn propose(&self, payload: Vec<u8>) -> Result<(), ReplicationError> {
        self.proposals
            .send(payload)
            .await
            .map_err(|_| ReplicationError::IntakeClosed)
    }

    async fn change_membership(&self, change: MembershipChange) -> Result<(), ReplicationError> {
        self.changes
            .send(change)
            .await
            .map_err(|_| ReplicationError::IntakeClosed)
    }
}
