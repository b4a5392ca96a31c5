//! # Chat Node
//!
//! Wires the subsystems of one node together.
//!
//! ## Startup Sequence
//!
//! 1. Open snapshot storage (file or memory)
//! 2. Create the engine and its channels
//! 3. Create the chat store on the engine's intake and the broadcast hub
//! 4. Spawn the engine (pulling snapshots from the store) and the apply loop
//!    (publishing into the hub)
//! 5. Wait for replay to catch up, then serve HTTP until the fatal signal

use super::config::NodeConfig;
use anyhow::{anyhow, bail, Context, Result};
use rc_01_replication::{
    EngineHandle, FatalSignal, FileSnapshotStore, LoopbackEngine, MemorySnapshotStore,
    ProposalIntake, SnapshotStore,
};
use rc_02_chat_store::{spawn_apply, ApplyError, ChatStore};
use rc_03_api_gateway::{ApiGatewayService, BroadcastHub};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct ChatNode {
    node_id: u64,
    fatal: FatalSignal,
    handle: EngineHandle,
    store: Arc<ChatStore>,
    hub: Arc<BroadcastHub>,
    gateway: ApiGatewayService,
    engine_task: JoinHandle<()>,
    apply_task: JoinHandle<Result<(), ApplyError>>,
}

impl ChatNode {
    /// Build and start every background task. Must be called inside a
    /// Tokio runtime.
    pub fn start(config: NodeConfig) -> Result<Self> {
        config.validate()?;
        let node_id = config.engine.node_id;

        let snapshots: Arc<dyn SnapshotStore> = match config.snapshot_dir() {
            Some(dir) => {
                info!(dir = %dir.display(), "Using file snapshot storage");
                Arc::new(
                    FileSnapshotStore::open(dir, config.storage.snapshots_retained)
                        .context("Failed to open snapshot directory")?,
                )
            }
            None => {
                warn!("No data directory configured, snapshots are kept in memory");
                Arc::new(MemorySnapshotStore::new())
            }
        };

        let fatal = FatalSignal::new();
        let (engine, handle, channels) =
            LoopbackEngine::new(config.engine.clone(), snapshots, fatal.clone())?;
        let intake: Arc<dyn ProposalIntake> = Arc::new(handle.clone());

        let store = Arc::new(ChatStore::new(Arc::clone(&intake)));
        let hub = Arc::new(BroadcastHub::new(config.gateway.websocket.queue_capacity));
        let gateway = ApiGatewayService::new(
            config.gateway.clone(),
            Arc::clone(&store),
            intake,
            Arc::clone(&hub),
            fatal.clone(),
        )?;

        let engine_task = engine.spawn(store.clone());
        let apply_task = spawn_apply(Arc::clone(&store), channels, hub.clone());

        info!(node_id, "Chat node started");
        Ok(Self {
            node_id,
            fatal,
            handle,
            store,
            hub,
            gateway,
            engine_task,
            apply_task,
        })
    }

    pub fn fatal(&self) -> &FatalSignal {
        &self.fatal
    }

    pub fn store(&self) -> &Arc<ChatStore> {
        &self.store
    }

    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.handle
    }

    /// Wait for replay, then serve on the configured address.
    pub async fn run(self) -> Result<()> {
        self.wait_ready().await?;
        let addr = self.gateway.addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        self.run_on(listener).await
    }

    /// Wait for replay, then serve on `listener` until the fatal signal.
    ///
    /// Returns `Err` with the fatal reason: a node only stops serving when
    /// it can no longer trust its state.
    pub async fn run_on(self, listener: TcpListener) -> Result<()> {
        self.wait_ready().await?;
        info!(node_id = self.node_id, "Replay caught up, serving HTTP");

        let Self {
            fatal,
            gateway,
            engine_task,
            apply_task,
            ..
        } = self;

        if let Err(e) = gateway.serve_on(listener).await {
            fatal.trigger(format!("API gateway failed: {e}"));
        }

        engine_task.abort();
        if let Ok(Err(e)) = apply_task.await {
            warn!(error = %e, "Apply loop stopped");
        }

        let reason = fatal
            .reason()
            .unwrap_or_else(|| "gateway stopped".to_string());
        Err(anyhow!("Node stopped: {reason}"))
    }

    /// Like [`run`](Self::run), but returns `Ok` once `shutdown` resolves.
    /// An operator stop never raises the fatal signal.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        until_shutdown(self.run(), shutdown).await
    }

    /// Like [`run_on`](Self::run_on), but returns `Ok` once `shutdown`
    /// resolves.
    pub async fn run_on_until(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        until_shutdown(self.run_on(listener), shutdown).await
    }

    async fn wait_ready(&self) -> Result<()> {
        let mut watcher = self.fatal.subscribe();
        tokio::select! {
            _ = self.store.wait_caught_up() => Ok(()),
            reason = watcher.wait() => bail!("Node failed during replay: {reason}"),
        }
    }
}

async fn until_shutdown(
    run: impl Future<Output = Result<()>>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::select! {
        result = run => result,
        () = shutdown => {
            info!("Shutdown requested, stopping node");
            Ok(())
        }
    }
}
