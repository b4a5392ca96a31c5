//! Engine configuration.

use serde::{Deserialize, Serialize};
use shared_types::NodeId;

use super::ReplicationError;

/// Default number of commits between engine-requested snapshots.
pub const DEFAULT_SNAPSHOT_INTERVAL: u64 = 10_000;

/// Default capacity of the proposal and commit channels.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Replication engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// This node's identifier (1-based position in `peers`).
    pub node_id: NodeId,
    /// Advertise addresses of the initial cluster, in node-id order.
    pub peers: Vec<String>,
    /// Join an existing cluster instead of bootstrapping one.
    pub join: bool,
    /// Commits between snapshots requested from the store.
    pub snapshot_interval: u64,
    /// Capacity of the proposal intake and commit stream channels.
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_id: 1,
            peers: vec!["http://127.0.0.1:9021".to_string()],
            join: false,
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ReplicationError> {
        if self.node_id == 0 {
            return Err(ReplicationError::Config("node_id cannot be 0".into()));
        }
        if self.snapshot_interval == 0 {
            return Err(ReplicationError::Config(
                "snapshot_interval cannot be 0".into(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ReplicationError::Config("queue_capacity cannot be 0".into()));
        }
        if !self.join && self.node_id as usize > self.peers.len() {
            return Err(ReplicationError::Config(format!(
                "node_id {} has no entry in a cluster of {} peers",
                self.node_id,
                self.peers.len()
            )));
        }
        Ok(())
    }

    /// Advertise address of this node, if listed in `peers`.
    pub fn advertise_addr(&self) -> Option<&str> {
        let position = usize::try_from(self.node_id).ok()?.checked_sub(1)?;
        self.peers.get(position).map(String::as_str)
    }
}
