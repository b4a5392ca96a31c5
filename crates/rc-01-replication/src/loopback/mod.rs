//! In-process replication engine.

mod engine;
mod handle;

pub use engine::{EngineChannels, LoopbackEngine};
pub use handle::EngineHandle;
