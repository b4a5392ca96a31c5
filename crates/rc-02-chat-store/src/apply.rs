//! # Apply Loop
//!
//! The single writer of the chat state.
//!
//! ```text
//! snapshot_ready ──→ wait for storage handoff
//!                         │
//! commits ──Barrier──→ load newest snapshot (if any) → install → caught up
//!         ──Committed─→ decode → append (exclusive lock) → observer.publish
//! ```
//!
//! Any failure here is terminal: the state could no longer be trusted to
//! match the other replicas.

use crate::domain::codec;
use crate::domain::{ApplyError, StoreError};
use crate::ports::CommitObserver;
use crate::service::ChatStore;
use rc_01_replication::{CommitEntry, EngineChannels, SnapshotStore};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Consume the commit stream until it closes or the fatal signal fires.
///
/// Never returns `Ok`: every way out of the loop is an error.
pub async fn run_apply(
    store: Arc<ChatStore>,
    channels: EngineChannels,
    observer: Arc<dyn CommitObserver>,
) -> Result<(), ApplyError> {
    let EngineChannels {
        mut commits,
        snapshot_ready,
        fatal,
    } = channels;
    let mut watcher = fatal.subscribe();

    let snapshots = tokio::select! {
        reason = watcher.wait() => return Err(ApplyError::Fatal(reason)),
        ready = snapshot_ready => ready.map_err(|_| ApplyError::SnapshotStorageMissing)?,
    };
    debug!("Snapshot storage received, applying commits");

    loop {
        let entry = tokio::select! {
            biased;
            reason = watcher.wait() => return Err(ApplyError::Fatal(reason)),
            entry = commits.recv() => entry.ok_or(ApplyError::CommitStreamClosed)?,
        };

        match entry {
            CommitEntry::Barrier => {
                load_snapshot(&store, snapshots.as_ref())?;
                store.mark_caught_up();
            }
            CommitEntry::Committed { index, payload } => {
                let event = codec::decode_event(&payload)
                    .map_err(|reason| ApplyError::Decode { index, reason })?;
                store.apply(index, &event);
                observer.publish(&event);
            }
        }
    }
}

/// Spawn [`run_apply`] and raise the fatal signal if it fails for any reason
/// other than the signal itself.
pub fn spawn_apply(
    store: Arc<ChatStore>,
    channels: EngineChannels,
    observer: Arc<dyn CommitObserver>,
) -> JoinHandle<Result<(), ApplyError>> {
    let fatal = channels.fatal.clone();
    tokio::spawn(async move {
        let result = run_apply(store, channels, observer).await;
        if let Err(e) = &result {
            if !matches!(e, ApplyError::Fatal(_)) {
                error!(error = %e, "Apply loop failed");
                fatal.trigger(e.to_string());
            }
        }
        result
    })
}

fn load_snapshot(store: &ChatStore, snapshots: &dyn SnapshotStore) -> Result<(), ApplyError> {
    let Some(snapshot) = snapshots.load()? else {
        debug!("No snapshot to load at barrier");
        return Ok(());
    };

    let term = snapshot.metadata.term;
    let index = snapshot.metadata.index;
    info!(term, index, "Loading snapshot at term {} and index {}", term, index);

    store
        .install_snapshot(&snapshot.data, index)
        .map_err(|e| {
            let reason = match e {
                StoreError::CorruptSnapshot(reason) => reason,
                other => other.to_string(),
            };
            ApplyError::CorruptSnapshot {
                term,
                index,
                reason,
            }
        })
}
