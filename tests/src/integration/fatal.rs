//! # Fatal Paths
//!
//! A node that can no longer trust its applied state stops serving and
//! reports why.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{memory_config, persistent_config, spawn_node, start_node};
    use rc_01_replication::{
        FileSnapshotStore, ProposalIntake, Snapshot, SnapshotMetadata, SnapshotStore,
    };

    #[tokio::test]
    async fn test_undecodable_commit_stops_node() {
        let node = spawn_node(memory_config()).await;
        let fatal = node.fatal.clone();

        node.engine.propose(vec![0xff; 3]).await.unwrap();

        let err = node.join().await.unwrap_err();
        assert!(err.starts_with("Node stopped"), "{err}");
        let reason = fatal.reason().unwrap();
        assert!(reason.contains("Undecodable commit at index 1"), "{reason}");
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_fails_replay() {
        let dir = tempfile::tempdir().unwrap();
        let config = persistent_config(dir.path(), 100);

        let snapshots = FileSnapshotStore::open(config.snapshot_dir().unwrap(), 5).unwrap();
        snapshots
            .save(&Snapshot {
                metadata: SnapshotMetadata { index: 7, term: 1 },
                data: b"not a chat state".to_vec(),
            })
            .unwrap();

        let node = start_node(config).await;
        let store = node.store.clone();

        let err = node.join().await.unwrap_err();
        assert!(err.starts_with("Node failed during replay"), "{err}");
        assert!(!store.is_caught_up());
    }
}
