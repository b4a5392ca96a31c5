//! HTTP middleware.
//!
//! Request tracing and body limits come straight from tower-http and axum;
//! only CORS needs translating from the gateway config.

pub mod cors;

pub use cors::create_cors_layer;
