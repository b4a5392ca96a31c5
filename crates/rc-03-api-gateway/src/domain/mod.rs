//! Gateway domain: configuration and error types.

pub mod config;
pub mod error;

pub use config::{
    ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig, WebSocketConfig,
};
pub use error::{ApiError, ApiResult, GatewayError};
