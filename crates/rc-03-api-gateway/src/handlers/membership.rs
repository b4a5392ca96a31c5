//! `/raft/{nodeID}`: optimistic cluster membership changes.

use crate::domain::error::{ApiError, ApiResult};
use crate::router::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rc_01_replication::MembershipChange;
use shared_types::NodeId;
use tracing::{info, warn};

/// `POST /raft/{nodeID}` with the new node's advertise address as body.
pub async fn add_member(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let node_id = parse_node_id(&raw_id)?;
    info!(node_id, addr = %String::from_utf8_lossy(&body), "Requesting node addition");
    state
        .intake
        .change_membership(MembershipChange::add_node(node_id, body.to_vec()))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /raft/{nodeID}`
pub async fn remove_member(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let node_id = parse_node_id(&raw_id)?;
    info!(node_id, "Requesting node removal");
    state
        .intake
        .change_membership(MembershipChange::remove_node(node_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Any other method on `/raft/{nodeID}`.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST, DELETE")],
        "Method not allowed",
    )
        .into_response()
}

/// Parse an unsigned 64-bit node id.
///
/// Accepts decimal and `0x`/`0o`/`0b` prefixed forms; a leading `0` means
/// octal. `_` may separate digits (`1_000`, `0x_1F`) but may not lead,
/// trail or repeat. Signs and empty strings are rejected.
pub fn parse_node_id(raw: &str) -> Result<NodeId, ApiError> {
    let invalid = || {
        warn!(node_id = %raw, "Rejected malformed node id");
        ApiError::bad_request(format!("Invalid node id: {raw:?}"))
    };

    let mut lower = raw.to_ascii_lowercase();
    if lower.contains('_') {
        if !underscores_separate_digits(&lower) {
            return Err(invalid());
        }
        lower.retain(|c| c != '_');
    }

    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };

    if !digits.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    u64::from_str_radix(digits, radix).map_err(|_| invalid())
}

/// Every `_` sits between digits or right after a base prefix.
fn underscores_separate_digits(lower: &str) -> bool {
    #[derive(PartialEq)]
    enum Last {
        Start,
        Digit,
        Underscore,
        Other,
    }

    let bytes = lower.as_bytes();
    let (rest, mut last, hex) = match bytes {
        [b'0', prefix @ (b'x' | b'o' | b'b'), rest @ ..] => (rest, Last::Digit, *prefix == b'x'),
        _ => (bytes, Last::Start, false),
    };

    for &c in rest {
        if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            last = Last::Digit;
        } else if c == b'_' {
            if last != Last::Digit {
                return false;
            }
            last = Last::Underscore;
        } else if last == Last::Underscore {
            return false;
        } else {
            last = Last::Other;
        }
    }
    last != Last::Underscore
}
