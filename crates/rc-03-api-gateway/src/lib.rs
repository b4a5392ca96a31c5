//! # rc-03-api-gateway
//!
//! External interface of a chat node: the HTTP room API, the membership
//! endpoints and the WebSocket broadcast hub.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    API GATEWAY (rc-03)                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  CORS → Trace → Body limit                                   │
//! │     │                                                        │
//! │     ├── /rooms, /rooms/{room} ──lookup()/propose()──→ Store  │
//! │     ├── /raft/{nodeID} ──change_membership()──→ Engine       │
//! │     ├── /health, /status                                     │
//! │     └── /ws ──register()──→ BroadcastHub                     │
//! │                                   ↑ publish() (apply task)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use rc_03_api_gateway::{ApiGatewayService, BroadcastHub, GatewayConfig};
//!
//! let hub = Arc::new(BroadcastHub::new(config.websocket.queue_capacity));
//! let gateway = ApiGatewayService::new(config, store, intake, hub, fatal)?;
//! gateway.serve().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod ws;

pub use domain::config::GatewayConfig;
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use handlers::membership::parse_node_id;
pub use router::{build_router, AppState};
pub use service::ApiGatewayService;
pub use ws::{BroadcastHub, PushMessage, Subscriber};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
