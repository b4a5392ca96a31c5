//! # Snapshot Restart
//!
//! A restarted node rebuilds its state from the newest persisted snapshot
//! before it serves, and continues numbering commits after it.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{eventually, persistent_config, post, spawn_node};
    use rc_01_replication::{FileSnapshotStore, SnapshotStore};

    #[tokio::test]
    async fn test_restart_restores_latest_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = persistent_config(dir.path(), 2);
        let snapshot_dir = config.snapshot_dir().unwrap();

        let first = spawn_node(config.clone()).await;
        for i in 1..=5u64 {
            first
                .store
                .propose("history", post("erin", &format!("p{i}")))
                .await
                .unwrap();
            let store = first.store.clone();
            eventually("post to be applied", || store.applied_index() == i).await;
        }
        first.stop().await.unwrap_err();

        let second = spawn_node(config).await;
        let latest = FileSnapshotStore::open(snapshot_dir, 5)
            .unwrap()
            .load()
            .unwrap()
            .expect("no snapshot written");
        let snapshot_index = latest.metadata.index;
        assert!(snapshot_index >= 1);

        assert_eq!(second.store.applied_index(), snapshot_index);
        assert_eq!(second.engine.commit_index(), snapshot_index);

        let posts = second.store.lookup("history").unwrap();
        assert_eq!(posts.len() as u64, snapshot_index);
        assert_eq!(posts[0].message, "p1");

        second
            .store
            .propose("history", post("erin", "after restart"))
            .await
            .unwrap();
        let store = second.store.clone();
        eventually("post after restart", || {
            store.applied_index() == snapshot_index + 1
        })
        .await;
        assert_eq!(
            store.lookup("history").unwrap().last().unwrap().message,
            "after restart"
        );

        second.stop().await.unwrap_err();
    }

    #[tokio::test]
    async fn test_empty_data_dir_starts_clean() {
        let dir = tempfile::tempdir().unwrap();
        let node = spawn_node(persistent_config(dir.path(), 100)).await;

        assert_eq!(node.store.applied_index(), 0);
        assert!(node.store.rooms().is_empty());
        assert!(dir.path().join("chat-1-snap").is_dir());

        node.stop().await.unwrap_err();
    }
}
