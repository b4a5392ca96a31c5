//! # Chat Store Service
//!
//! Owns the applied [`ChatState`] behind a single `RwLock`.
//!
//! - Readers (`lookup`, `rooms`, snapshot capture) take the shared lock and
//!   copy out what they need.
//! - The apply task is the only writer. It takes the exclusive lock for the
//!   append and nothing else.
//! - Proposals never touch the state; they are encoded and handed to the
//!   engine's intake.

use crate::domain::codec;
use crate::domain::{ChatState, StoreError};
use parking_lot::RwLock;
use rc_01_replication::{AppliedSnapshot, ProposalIntake, SnapshotSource};
use shared_types::{Post, RoomEvent};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

struct Applied {
    state: ChatState,
    /// Index of the last commit reflected in `state`.
    index: u64,
}

pub struct ChatStore {
    applied: RwLock<Applied>,
    intake: Arc<dyn ProposalIntake>,
    caught_up: watch::Sender<bool>,
}

impl ChatStore {
    pub fn new(intake: Arc<dyn ProposalIntake>) -> Self {
        let (caught_up, _) = watch::channel(false);
        Self {
            applied: RwLock::new(Applied {
                state: ChatState::new(),
                index: 0,
            }),
            intake,
            caught_up,
        }
    }

    /// Encode and submit a post. Returns once the engine has accepted the
    /// payload; there is no commit confirmation.
    pub async fn propose(&self, room: &str, post: Post) -> Result<(), StoreError> {
        let event = RoomEvent::new(room, post);
        let payload = codec::encode_event(&event).map_err(StoreError::Encode)?;
        self.intake.propose(payload).await?;
        debug!(room = %room, "Proposed post");
        Ok(())
    }

    /// Posts of a room in commit order, or `None` if it never received one.
    pub fn lookup(&self, room: &str) -> Option<Vec<Post>> {
        self.applied.read().state.posts(room).map(<[Post]>::to_vec)
    }

    pub fn rooms(&self) -> Vec<String> {
        self.applied.read().state.room_names()
    }

    pub fn room_count(&self) -> usize {
        self.applied.read().state.room_count()
    }

    pub fn post_count(&self) -> usize {
        self.applied.read().state.post_count()
    }

    /// Index of the last applied commit.
    pub fn applied_index(&self) -> u64 {
        self.applied.read().index
    }

    /// Serialize the whole applied state.
    pub fn capture_snapshot(&self) -> Result<Vec<u8>, StoreError> {
        codec::encode_state(&self.applied.read().state).map_err(StoreError::Encode)
    }

    /// Replace the whole state with a snapshot taken at `index`. State and
    /// applied index change under one write lock; on error both are left
    /// untouched.
    pub fn install_snapshot(&self, data: &[u8], index: u64) -> Result<(), StoreError> {
        let state = codec::decode_state(data).map_err(StoreError::CorruptSnapshot)?;
        let rooms = state.room_count();
        {
            let mut applied = self.applied.write();
            applied.state = state;
            applied.index = index;
        }
        info!(index, rooms, "Installed snapshot");
        Ok(())
    }

    pub(crate) fn apply(&self, index: u64, event: &RoomEvent) {
        let mut applied = self.applied.write();
        applied.state.append(&event.room_name, event.post.clone());
        applied.index = index;
    }

    pub(crate) fn mark_caught_up(&self) {
        let flipped = self.caught_up.send_if_modified(|done| !std::mem::replace(done, true));
        if flipped {
            info!(index = self.applied_index(), "Replay caught up");
        }
    }

    /// Whether the first startup barrier has been applied.
    pub fn is_caught_up(&self) -> bool {
        *self.caught_up.borrow()
    }

    /// Resolve once historical replay has caught up.
    pub async fn wait_caught_up(&self) {
        let mut rx = self.caught_up.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|done| *done).await;
    }
}

impl SnapshotSource for ChatStore {
    fn capture_snapshot(&self) -> Result<AppliedSnapshot, String> {
        let applied = self.applied.read();
        let data = codec::encode_state(&applied.state)?;
        Ok(AppliedSnapshot {
            applied_index: applied.index,
            data,
        })
    }
}
