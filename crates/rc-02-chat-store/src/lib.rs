//! # rc-02-chat-store
//!
//! Applied State Store of the chat log.
//!
//! ## Role in System
//!
//! - **Single writer**: only the apply loop mutates the state, in commit order
//! - **Read model**: the API gateway reads rooms and posts straight from here
//! - **Snapshot source**: the replication engine pulls full-state snapshots
//!
//! ```text
//! [API Gateway] ──propose()──→ [Replication Engine]
//!       │                              │ commit stream
//!       │ lookup()/rooms()             ↓
//!       └──────────────────────→ [Chat Store] ──publish()──→ [Broadcast Hub]
//! ```

pub mod apply;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

pub use apply::{run_apply, spawn_apply};
pub use domain::{ApplyError, ChatState, StoreError};
pub use ports::CommitObserver;
pub use service::ChatStore;
