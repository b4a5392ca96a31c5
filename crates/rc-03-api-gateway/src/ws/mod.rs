//! WebSocket push of committed events.

pub mod handler;
pub mod hub;

pub use hub::{BroadcastHub, ConnectionId, PushMessage, Subscriber};
