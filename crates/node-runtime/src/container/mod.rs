//! # Node Container
//!
//! Configuration and wiring for a single chat node.

pub mod config;
pub mod node;

pub use config::{load_config, load_config_from, ConfigError, NodeConfig};
pub use node::ChatNode;
