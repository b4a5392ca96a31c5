//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chat**: `Post`, `PostSubmission`, `RoomEvent`
//! - **Cluster**: `NodeId`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: CHAT
// =============================================================================

/// A single chat message as stored in a room.
///
/// Immutable once created. `posted_at` is fixed by the node that received the
/// originating request, before the event is proposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Display name of the author.
    #[serde(rename = "User")]
    pub author: String,
    /// Message body.
    #[serde(rename = "Message")]
    pub message: String,
    /// Proposal-time timestamp (RFC 3339, UTC).
    #[serde(rename = "PostedAt")]
    pub posted_at: DateTime<Utc>,
}

impl Post {
    /// Create a post stamped with the given time.
    pub fn new(
        author: impl Into<String>,
        message: impl Into<String>,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
            posted_at,
        }
    }
}

/// Client-supplied body of `POST /rooms/{room}`.
///
/// The server assigns `PostedAt`; a client-provided value is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSubmission {
    #[serde(rename = "User", default)]
    pub author: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

impl PostSubmission {
    /// Stamp the submission, producing the immutable `Post`.
    pub fn stamp(self, posted_at: DateTime<Utc>) -> Post {
        Post {
            author: self.author,
            message: self.message,
            posted_at,
        }
    }
}

/// The atomic unit of replication: one post into one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEvent {
    #[serde(rename = "RoomName")]
    pub room_name: String,
    #[serde(rename = "Post")]
    pub post: Post,
}

impl RoomEvent {
    pub fn new(room_name: impl Into<String>, post: Post) -> Self {
        Self {
            room_name: room_name.into(),
            post,
        }
    }
}

// =============================================================================
// CLUSTER B: CLUSTER MEMBERSHIP
// =============================================================================

/// Identifier of a node in the replicated group.
pub type NodeId = u64;
