//! HTTP request handlers, grouped by resource.

pub mod membership;
pub mod rooms;
pub mod status;
