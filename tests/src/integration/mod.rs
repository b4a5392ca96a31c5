//! Integration scenarios. Each test runs its own node.

mod broadcast;
mod fatal;
mod fixtures;
mod http_flow;
mod snapshots;
