//! # Shared Types Crate
//!
//! Domain entities of the replicated chat log.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Post` and `RoomEvent` are defined once and
//!   used by the store, the gateway and the integration tests.
//! - **Wire Compatibility**: field names are fixed by `serde` renames
//!   (`User`, `Message`, `PostedAt`, `RoomName`, `Post`) so the HTTP, push and
//!   log encodings all agree.
//! - **Timestamps Travel With The Event**: `posted_at` is assigned before a
//!   proposal is replicated; replicas never re-stamp.

pub mod entities;

pub use entities::*;
