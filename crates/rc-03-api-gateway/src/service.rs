//! API Gateway service - owns the HTTP server lifecycle.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::router::{build_router, AppState};
use crate::ws::BroadcastHub;
use axum::Router;
use rc_01_replication::{FatalSignal, ProposalIntake};
use rc_02_chat_store::ChatStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
    fatal: FatalSignal,
}

impl ApiGatewayService {
    pub fn new(
        config: GatewayConfig,
        store: Arc<ChatStore>,
        intake: Arc<dyn ProposalIntake>,
        hub: Arc<BroadcastHub>,
        fatal: FatalSignal,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let state = AppState {
            store,
            intake,
            hub,
            websocket: config.websocket.clone(),
            fatal: fatal.subscribe(),
        };
        Ok(Self {
            config,
            state,
            fatal,
        })
    }

    /// Configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.config.http_addr()
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Bind the configured address and serve until the fatal signal fires.
    pub async fn serve(self) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener until the fatal signal fires.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), GatewayError> {
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        let router = self.router();
        let mut watcher = self.fatal.subscribe();

        info!(addr = ?addr, "Starting HTTP server");
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let reason = watcher.wait().await;
                info!(reason = %reason, "Shutting down HTTP server");
            })
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))?;

        info!("API Gateway stopped");
        Ok(())
    }
}
