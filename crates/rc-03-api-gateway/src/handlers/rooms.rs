//! `/rooms` and `/rooms/{room}`.

use crate::domain::error::{ApiError, ApiResult};
use crate::router::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use shared_types::{Post, PostSubmission};
use tracing::{debug, info, warn};

/// `GET /rooms`
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<String>> {
    debug!("Serving list of rooms");
    Json(state.store.rooms())
}

/// `GET /rooms/{room}`. A room that never received a post is an empty list.
pub async fn room_posts(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Json<Vec<Post>> {
    debug!(room = %room, "Serving room posts");
    Json(state.store.lookup(&room).unwrap_or_default())
}

/// `POST /rooms/{room}`. Acknowledged once the proposal is accepted; the
/// post shows up in reads and pushes only after it commits.
pub async fn post_to_room(
    State(state): State<AppState>,
    Path(room): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let submission: PostSubmission = serde_json::from_slice(&body).map_err(|e| {
        warn!(room = %room, error = %e, "Rejected post body");
        ApiError::bad_request(format!("Invalid post body: {e}"))
    })?;

    let post = submission.stamp(Utc::now());
    state.store.propose(&room, post).await?;
    info!(room = %room, "Accepted post");
    Ok(StatusCode::CREATED)
}
