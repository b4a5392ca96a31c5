//! Single-node total-order engine.
//!
//! Commits proposals in intake order, one index per proposal. On startup it
//! hands over the snapshot store, then emits a `Barrier` so the consumer loads
//! whatever snapshot survived the last run. Every `snapshot_interval` commits
//! it pulls a snapshot from the `SnapshotSource` and persists it.
//!
//! Membership changes are tracked but do not occupy log indices and are not
//! forwarded on the commit stream.

use super::handle::{EngineHandle, Membership};
use crate::domain::{
    CommitEntry, EngineConfig, MembershipChange, MembershipChangeKind, ReplicationError, Snapshot,
    SnapshotMetadata,
};
use crate::ports::{SnapshotSource, SnapshotStore};
use crate::signal::FatalSignal;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The consumer side of the engine, owned by the chat store's apply task.
pub struct EngineChannels {
    /// Ordered commit stream.
    pub commits: mpsc::Receiver<CommitEntry>,
    /// One-shot handoff of the snapshot store, delivered before any commit.
    pub snapshot_ready: oneshot::Receiver<Arc<dyn SnapshotStore>>,
    /// The node-wide fatal signal the engine raises when it cannot continue.
    pub fatal: FatalSignal,
}

pub struct LoopbackEngine {
    config: EngineConfig,
    proposals: mpsc::Receiver<Vec<u8>>,
    changes: mpsc::Receiver<MembershipChange>,
    commits: mpsc::Sender<CommitEntry>,
    snapshot_ready: Option<oneshot::Sender<Arc<dyn SnapshotStore>>>,
    snapshots: Arc<dyn SnapshotStore>,
    fatal: FatalSignal,
    membership: Membership,
    commit_index: Arc<AtomicU64>,
    term: u64,
    last_snapshot_index: u64,
}

impl LoopbackEngine {
    /// Build the engine, its intake handle and the consumer channels.
    pub fn new(
        config: EngineConfig,
        snapshots: Arc<dyn SnapshotStore>,
        fatal: FatalSignal,
    ) -> Result<(Self, EngineHandle, EngineChannels), ReplicationError> {
        config.validate()?;

        let (proposals_tx, proposals_rx) = mpsc::channel(config.queue_capacity);
        let (changes_tx, changes_rx) = mpsc::channel(config.queue_capacity);
        let (commits_tx, commits_rx) = mpsc::channel(config.queue_capacity);
        let (ready_tx, ready_rx) = oneshot::channel();

        let membership: Membership = Arc::new(RwLock::new(initial_membership(&config)));
        let commit_index = Arc::new(AtomicU64::new(0));

        let handle = EngineHandle {
            proposals: proposals_tx,
            changes: changes_tx,
            membership: Arc::clone(&membership),
            commit_index: Arc::clone(&commit_index),
        };
        let channels = EngineChannels {
            commits: commits_rx,
            snapshot_ready: ready_rx,
            fatal: fatal.clone(),
        };
        let engine = Self {
            config,
            proposals: proposals_rx,
            changes: changes_rx,
            commits: commits_tx,
            snapshot_ready: Some(ready_tx),
            snapshots,
            fatal,
            membership,
            commit_index,
            term: 1,
            last_snapshot_index: 0,
        };
        Ok((engine, handle, channels))
    }

    pub fn spawn(self, source: Arc<dyn SnapshotSource>) -> JoinHandle<()> {
        tokio::spawn(self.run(source))
    }

    /// Drive the engine until every intake handle is dropped or the fatal
    /// signal fires. Internal failures raise the fatal signal.
    pub async fn run(mut self, source: Arc<dyn SnapshotSource>) {
        info!(
            node_id = self.config.node_id,
            peers = self.config.peers.len(),
            join = self.config.join,
            "Starting loopback replication engine"
        );

        if let Err(reason) = self.start().await {
            self.fatal.trigger(reason);
            return;
        }

        let mut fatal = self.fatal.subscribe();
        let mut proposals_open = true;
        let mut changes_open = true;

        while proposals_open || changes_open {
            tokio::select! {
                reason = fatal.wait() => {
                    debug!(reason = %reason, "Loopback engine observed fatal signal");
                    return;
                }
                payload = self.proposals.recv(), if proposals_open => match payload {
                    Some(payload) => {
                        if let Err(reason) = self.commit(payload, source.as_ref()).await {
                            self.fatal.trigger(reason);
                            return;
                        }
                    }
                    None => proposals_open = false,
                },
                change = self.changes.recv(), if changes_open => match change {
                    Some(change) => {
                        if let Err(reason) = self.apply_membership(change) {
                            self.fatal.trigger(reason);
                            return;
                        }
                    }
                    None => changes_open = false,
                },
            }
        }

        info!("All intake handles dropped, loopback engine stopping");
    }

    async fn start(&mut self) -> Result<(), String> {
        let existing = self
            .snapshots
            .load()
            .map_err(|e| format!("failed to read snapshot storage: {e}"))?;

        if let Some(snapshot) = existing {
            self.term = snapshot.metadata.term.max(1);
            self.last_snapshot_index = snapshot.metadata.index;
            self.commit_index
                .store(snapshot.metadata.index, Ordering::Release);
            info!(
                index = snapshot.metadata.index,
                term = snapshot.metadata.term,
                "Resuming from persisted snapshot"
            );
        }

        if let Some(ready) = self.snapshot_ready.take() {
            if ready.send(Arc::clone(&self.snapshots)).is_err() {
                warn!("Snapshot storage handoff dropped by consumer");
            }
        }

        self.commits
            .send(CommitEntry::Barrier)
            .await
            .map_err(|_| "commit stream consumer gone".to_string())
    }

    async fn commit(
        &mut self,
        payload: Vec<u8>,
        source: &dyn SnapshotSource,
    ) -> Result<(), String> {
        let index = self.commit_index.load(Ordering::Acquire) + 1;
        self.commits
            .send(CommitEntry::committed(index, payload))
            .await
            .map_err(|_| "commit stream consumer gone".to_string())?;
        self.commit_index.store(index, Ordering::Release);

        if index - self.last_snapshot_index >= self.config.snapshot_interval {
            self.take_snapshot(source)?;
        }
        Ok(())
    }

    fn take_snapshot(&mut self, source: &dyn SnapshotSource) -> Result<(), String> {
        let captured = source
            .capture_snapshot()
            .map_err(|e| format!("snapshot capture failed: {e}"))?;

        if captured.applied_index <= self.last_snapshot_index {
            debug!(
                applied = captured.applied_index,
                last_snapshot = self.last_snapshot_index,
                "Store has not applied past the last snapshot yet"
            );
            return Ok(());
        }

        let snapshot = Snapshot {
            metadata: SnapshotMetadata {
                index: captured.applied_index,
                term: self.term,
            },
            data: captured.data,
        };
        self.snapshots
            .save(&snapshot)
            .map_err(|e| format!("failed to save snapshot: {e}"))?;
        self.last_snapshot_index = captured.applied_index;

        info!(index = captured.applied_index, "Compacted log at snapshot");
        Ok(())
    }

    fn apply_membership(&mut self, change: MembershipChange) -> Result<(), String> {
        match change.kind {
            MembershipChangeKind::AddNode => {
                let addr = String::from_utf8_lossy(&change.context).into_owned();
                info!(node_id = change.node_id, addr = %addr, "Adding node to cluster");
                self.membership.write().insert(change.node_id, addr);
            }
            MembershipChangeKind::RemoveNode => {
                info!(node_id = change.node_id, "Removing node from cluster");
                self.membership.write().remove(&change.node_id);
                if change.node_id == self.config.node_id {
                    return Err("this node has been removed from the cluster".to_string());
                }
            }
        }
        Ok(())
    }
}

fn initial_membership(config: &EngineConfig) -> BTreeMap<u64, String> {
    if config.join {
        let mut members = BTreeMap::new();
        members.insert(
            config.node_id,
            config.advertise_addr().unwrap_or_default().to_string(),
        );
        return members;
    }
    config
        .peers
        .iter()
        .enumerate()
        .map(|(i, addr)| (i as u64 + 1, addr.clone()))
        .collect()
}
