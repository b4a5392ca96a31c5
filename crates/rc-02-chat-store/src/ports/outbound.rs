//! Driven ports (Outbound dependencies)

use shared_types::RoomEvent;

/// Receives every event right after it has been applied.
///
/// Called from the apply task, once per event, in commit order, with no store
/// lock held. Implementations must not block.
pub trait CommitObserver: Send + Sync {
    fn publish(&self, event: &RoomEvent);
}
