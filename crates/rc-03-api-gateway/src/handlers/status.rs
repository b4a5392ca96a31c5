//! Liveness and node status.

use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "api-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Serialize)]
pub struct NodeStatus {
    pub rooms: usize,
    pub posts: usize,
    pub applied_index: u64,
    pub caught_up: bool,
    pub ws_connections: usize,
    pub events_published: u64,
    pub ws_evictions: u64,
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> Json<NodeStatus> {
    Json(NodeStatus {
        rooms: state.store.room_count(),
        posts: state.store.post_count(),
        applied_index: state.store.applied_index(),
        caught_up: state.store.is_caught_up(),
        ws_connections: state.hub.connection_count(),
        events_published: state.hub.events_published(),
        ws_evictions: state.hub.evictions(),
    })
}
