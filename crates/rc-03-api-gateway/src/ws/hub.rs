//! Broadcast hub: fan-out of committed events to live WebSocket subscribers.
//!
//! Every subscriber owns a bounded queue drained by its own writer task.
//! `publish` runs on the apply task and never waits: it serializes the event
//! once and `try_send`s it to every queue. A queue that is full (stalled
//! client) or closed (socket gone) gets its subscriber evicted; the others
//! are unaffected.
//!
//! Subscribers only see events published after they registered.

use dashmap::DashMap;
use rc_02_chat_store::CommitObserver;
use serde::Serialize;
use shared_types::{Post, RoomEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

pub type ConnectionId = u64;

/// One push frame: the post with its room name alongside.
#[derive(Debug, Serialize)]
pub struct PushMessage<'a> {
    #[serde(rename = "RoomName")]
    pub room_name: &'a str,
    #[serde(flatten)]
    pub post: &'a Post,
}

impl<'a> PushMessage<'a> {
    pub fn from_event(event: &'a RoomEvent) -> Self {
        Self {
            room_name: &event.room_name,
            post: &event.post,
        }
    }
}

/// The receiving end of a registration.
#[derive(Debug)]
pub struct Subscriber {
    pub id: ConnectionId,
    pub messages: mpsc::Receiver<Arc<str>>,
}

pub struct BroadcastHub {
    connections: DashMap<ConnectionId, mpsc::Sender<Arc<str>>>,
    next_id: AtomicU64,
    queue_capacity: usize,
    events_published: AtomicU64,
    evictions: AtomicU64,
}

impl BroadcastHub {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            connections: DashMap::new(),
            next_id: AtomicU64::new(1),
            queue_capacity: queue_capacity.max(1),
            events_published: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Add a connection to the live set.
    pub fn register(&self) -> Subscriber {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        self.connections.insert(id, tx);
        debug!(connection_id = id, "Registered subscriber");
        Subscriber { id, messages: rx }
    }

    /// Remove a connection. Returns `false` if it was already gone.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.remove(&id).is_some();
        if removed {
            debug!(connection_id = id, "Unregistered subscriber");
        }
        removed
    }

    /// Enqueue an event to every registered connection.
    pub fn publish(&self, event: &RoomEvent) {
        let frame: Arc<str> = match serde_json::to_string(&PushMessage::from_event(event)) {
            Ok(json) => Arc::from(json),
            Err(e) => {
                warn!(error = %e, room = %event.room_name, "Failed to serialize push message");
                return;
            }
        };
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let mut evicted = Vec::new();
        for entry in self.connections.iter() {
            match entry.value().try_send(Arc::clone(&frame)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => evicted.push((*entry.key(), "queue full")),
                Err(TrySendError::Closed(_)) => evicted.push((*entry.key(), "connection closed")),
            }
        }

        for (id, reason) in evicted {
            if self.connections.remove(&id).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                warn!(connection_id = id, reason, "Evicted subscriber");
            }
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

impl CommitObserver for BroadcastHub {
    fn publish(&self, event: &RoomEvent) {
        BroadcastHub::publish(self, event);
    }
}
