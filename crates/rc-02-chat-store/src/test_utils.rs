//! Test doubles shared by the store's unit tests.

use crate::ports::CommitObserver;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use rc_01_replication::{MembershipChange, ProposalIntake, ReplicationError};
use shared_types::{Post, RoomEvent};

pub fn post(author: &str, message: &str) -> Post {
    Post::new(author, message, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

/// Intake that records payloads instead of ordering them.
#[derive(Default)]
pub struct RecordingIntake {
    closed: bool,
    proposals: Mutex<Vec<Vec<u8>>>,
}

impl RecordingIntake {
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    pub fn proposals(&self) -> Vec<Vec<u8>> {
        self.proposals.lock().clone()
    }
}

#[async_trait]
impl ProposalIntake for RecordingIntake {
    async fn propose(&self, payload: Vec<u8>) -> Result<(), ReplicationError> {
        if self.closed {
            return Err(ReplicationError::IntakeClosed);
        }
        self.proposals.lock().push(payload);
        Ok(())
    }

    async fn change_membership(&self, _change: MembershipChange) -> Result<(), ReplicationError> {
        if self.closed {
            return Err(ReplicationError::IntakeClosed);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RoomEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<RoomEvent> {
        self.events.lock().clone()
    }
}

impl CommitObserver for RecordingObserver {
    fn publish(&self, event: &RoomEvent) {
        self.events.lock().push(event.clone());
    }
}
