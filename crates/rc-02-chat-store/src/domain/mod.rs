//! Chat store domain: the applied state, its encodings and errors.

pub mod codec;
pub mod errors;
pub mod state;

pub use errors::{ApplyError, StoreError};
pub use state::ChatState;
