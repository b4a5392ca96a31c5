//! # Relay-Chat Test Suite
//!
//! Cross-subsystem tests that start complete nodes (engine, store, apply
//! loop, gateway) on ephemeral ports.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # node startup and polling helpers
//!     ├── http_flow.rs    # REST surface against a live node
//!     ├── broadcast.rs    # push fan-out driven by commits
//!     ├── fatal.rs        # errors that must stop the node
//!     └── snapshots.rs    # restart from persisted snapshots
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rc-tests
//! ```

#[cfg(test)]
mod integration;
