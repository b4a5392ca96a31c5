//! Shared setup for the integration scenarios.

use chrono::{TimeZone, Utc};
use node_runtime::{ChatNode, NodeConfig};
use rc_01_replication::{EngineHandle, FatalSignal};
use rc_02_chat_store::ChatStore;
use rc_03_api_gateway::BroadcastHub;
use shared_types::Post;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const WAIT: Duration = Duration::from_secs(5);

/// A node serving on an ephemeral port, plus handles to its internals.
pub struct RunningNode {
    pub base_url: String,
    pub store: Arc<ChatStore>,
    pub hub: Arc<BroadcastHub>,
    pub engine: EngineHandle,
    pub fatal: FatalSignal,
    pub task: JoinHandle<Result<(), String>>,
}

impl RunningNode {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trigger the fatal signal and wait for `run_on` to return.
    pub async fn stop(self) -> Result<(), String> {
        self.fatal.trigger("test teardown");
        self.join().await
    }

    pub async fn join(self) -> Result<(), String> {
        tokio::time::timeout(WAIT, self.task)
            .await
            .expect("node did not stop")
            .expect("node task panicked")
    }
}

/// Single-node cluster keeping snapshots in memory.
pub fn memory_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.storage.data_dir = None;
    config
}

/// Single-node cluster persisting snapshots under `root`.
pub fn persistent_config(root: &Path, snapshot_interval: u64) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.storage.data_dir = Some(root.to_path_buf());
    config.engine.snapshot_interval = snapshot_interval;
    config
}

/// Start a node without waiting for replay.
pub async fn start_node(config: NodeConfig) -> RunningNode {
    let node = ChatNode::start(config).expect("node failed to start");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store = Arc::clone(node.store());
    let hub = Arc::clone(node.hub());
    let engine = node.engine().clone();
    let fatal = node.fatal().clone();
    let task = tokio::spawn(async move { node.run_on(listener).await.map_err(|e| e.to_string()) });

    RunningNode {
        base_url: format!("http://{addr}"),
        store,
        hub,
        engine,
        fatal,
        task,
    }
}

/// Start a node and wait until it has finished replay.
pub async fn spawn_node(config: NodeConfig) -> RunningNode {
    let node = start_node(config).await;
    tokio::time::timeout(WAIT, node.store.wait_caught_up())
        .await
        .expect("node never caught up");
    node
}

/// Poll `check` until it holds.
pub async fn eventually(what: &str, check: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + WAIT;
    while !check() {
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn post(author: &str, message: &str) -> Post {
    Post::new(
        author,
        message,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    )
}
