//! Wire encodings owned by the store.
//!
//! - Log entries: `bincode` of a [`RoomEvent`].
//! - Snapshots: JSON of the whole [`ChatState`].

use super::state::ChatState;
use shared_types::RoomEvent;

pub fn encode_event(event: &RoomEvent) -> Result<Vec<u8>, String> {
    bincode::serialize(event).map_err(|e| e.to_string())
}

pub fn decode_event(bytes: &[u8]) -> Result<RoomEvent, String> {
    bincode::deserialize(bytes).map_err(|e| e.to_string())
}

pub fn encode_state(state: &ChatState) -> Result<Vec<u8>, String> {
    serde_json::to_vec(state).map_err(|e| e.to_string())
}

pub fn decode_state(bytes: &[u8]) -> Result<ChatState, String> {
    serde_json::from_slice(bytes).map_err(|e| e.to_string())
}
