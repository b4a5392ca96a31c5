//! # Relay-Chat Node Runtime
//!
//! Entry point for one replica of the chat log.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging
//! 3. Start the replication engine, chat store and apply loop
//! 4. Wait for snapshot and log replay to finish
//! 5. Serve HTTP and WebSocket until Ctrl+C or a fatal error
//!
//! A fatal error (undecodable commit, corrupt snapshot, lost engine) ends the
//! process with a non-zero exit code.

use anyhow::Result;
use node_runtime::container::{load_config, ChatNode, NodeConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &NodeConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if config.logging.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    init_tracing(&config)?;

    info!("===========================================");
    info!("  Relay-Chat Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!("Node ID: {}", config.engine.node_id);
    info!("Cluster: {}", config.engine.peers.join(","));
    info!("HTTP Port: {}", config.gateway.http.port);
    info!("Snapshot Dir: {:?}", config.snapshot_dir());

    let node = ChatNode::start(config)?;
    node.run_until(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    })
    .await
}
