//! # Node Runtime Library
//!
//! Exposes the node container so integration tests can start full nodes.
//! The main entry point is the `main.rs` binary.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod container;

pub use container::{load_config, load_config_from, ChatNode, ConfigError, NodeConfig};
