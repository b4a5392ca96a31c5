//! HTTP routing.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/rooms` | [`rooms::list_rooms`] |
//! | GET, POST | `/rooms/{room}` | [`rooms::room_posts`], [`rooms::post_to_room`] |
//! | GET | `/ws` | [`handler::upgrade`] |
//! | POST, DELETE | `/raft/{nodeID}` | [`membership::add_member`], [`membership::remove_member`] |
//! | GET | `/health`, `/status` | [`status::health`], [`status::status`] |

use crate::domain::config::{GatewayConfig, WebSocketConfig};
use crate::handlers::{membership, rooms, status};
use crate::middleware::create_cors_layer;
use crate::ws::handler;
use crate::ws::BroadcastHub;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use rc_01_replication::{FatalWatcher, ProposalIntake};
use rc_02_chat_store::ChatStore;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChatStore>,
    pub intake: Arc<dyn ProposalIntake>,
    pub hub: Arc<BroadcastHub>,
    pub websocket: WebSocketConfig,
    pub fatal: FatalWatcher,
}

pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(create_cors_layer(&config.cors))
        .map_response(|response: axum::response::Response<_>| response.map(axum::body::Body::new))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.limits.max_body_size));

    Router::new()
        .route("/rooms", get(rooms::list_rooms))
        .route(
            "/rooms/:room",
            get(rooms::room_posts).post(rooms::post_to_room),
        )
        .route("/ws", get(handler::upgrade))
        .route(
            "/raft/:node_id",
            post(membership::add_member)
                .delete(membership::remove_member)
                .fallback(membership::method_not_allowed),
        )
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .layer(middleware)
        .with_state(state)
}
