//! The applied chat state.
//!
//! Rooms are implicit: a room exists once its first post has been applied.
//! Keys are kept ordered so that two replicas with the same applied prefix
//! serialize to identical bytes.

use serde::{Deserialize, Serialize};
use shared_types::Post;
use std::collections::BTreeMap;

/// Room name → posts in commit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatState {
    rooms: BTreeMap<String, Vec<Post>>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed post to the end of its room.
    pub fn append(&mut self, room: &str, post: Post) {
        match self.rooms.get_mut(room) {
            Some(posts) => posts.push(post),
            None => {
                self.rooms.insert(room.to_string(), vec![post]);
            }
        }
    }

    pub fn posts(&self, room: &str) -> Option<&[Post]> {
        self.rooms.get(room).map(Vec::as_slice)
    }

    /// Names of every room with at least one post, in key order.
    pub fn room_names(&self) -> Vec<String> {
        self.rooms.keys().cloned().collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn post_count(&self) -> usize {
        self.rooms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
