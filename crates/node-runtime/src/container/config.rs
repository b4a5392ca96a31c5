//! # Node Configuration
//!
//! Unified configuration for a chat node, loaded from environment variables:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `RC_NODE_ID` | this node's id (1-based position in the cluster list) | `1` |
//! | `RC_CLUSTER` | comma separated peer addresses | `http://127.0.0.1:9021` |
//! | `RC_JOIN` | join an existing cluster | `false` |
//! | `RC_HTTP_PORT` | HTTP API port | `9121` |
//! | `RC_DATA_DIR` | snapshot directory root; empty keeps snapshots in memory | `./data` |
//! | `RC_SNAPSHOT_INTERVAL` | commits between snapshots | `10000` |
//! | `RC_SNAPSHOTS_RETAINED` | snapshot files kept on disk | `5` |
//! | `RC_LOG_JSON` | JSON log output | `false` |

use rc_01_replication::adapters::file_snapshots::DEFAULT_RETAINED_SNAPSHOTS;
use rc_01_replication::EngineConfig;
use rc_03_api_gateway::GatewayConfig;
use std::path::PathBuf;
use std::str::FromStr;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Replication engine configuration.
    pub engine: EngineConfig,
    /// API Gateway configuration.
    pub gateway: GatewayConfig,
    /// Snapshot storage configuration.
    pub storage: StorageConfig,
    /// Log output configuration.
    pub logging: LoggingConfig,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.storage.snapshots_retained == 0 {
            return Err(ConfigError::Invalid(
                "snapshots_retained cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Directory holding this node's snapshot files, if persistent.
    pub fn snapshot_dir(&self) -> Option<PathBuf> {
        self.storage
            .data_dir
            .as_ref()
            .map(|root| root.join(format!("chat-{}-snap", self.engine.node_id)))
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root data directory. `None` keeps snapshots in memory only.
    pub data_dir: Option<PathBuf>,
    pub snapshots_retained: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from("./data")),
            snapshots_retained: DEFAULT_RETAINED_SNAPSHOTS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub json: bool,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidVar {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<NodeConfig, ConfigError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> Result<NodeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = NodeConfig::default();

    if let Some(id) = parse_var(&lookup, "RC_NODE_ID")? {
        config.engine.node_id = id;
    }
    if let Some(cluster) = lookup("RC_CLUSTER") {
        config.engine.peers = cluster
            .split(',')
            .map(str::trim)
            .filter(|peer| !peer.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(join) = lookup("RC_JOIN") {
        config.engine.join = parse_bool("RC_JOIN", &join)?;
    }
    if let Some(port) = parse_var(&lookup, "RC_HTTP_PORT")? {
        config.gateway.http.port = port;
    }
    if let Some(interval) = parse_var(&lookup, "RC_SNAPSHOT_INTERVAL")? {
        config.engine.snapshot_interval = interval;
    }
    if let Some(dir) = lookup("RC_DATA_DIR") {
        config.storage.data_dir = if dir.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(dir))
        };
    }
    if let Some(retained) = parse_var(&lookup, "RC_SNAPSHOTS_RETAINED")? {
        config.storage.snapshots_retained = retained;
    }
    if let Some(json) = lookup("RC_LOG_JSON") {
        config.logging.json = parse_bool("RC_LOG_JSON", &json)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidVar {
            key,
            value,
            reason: e.to_string(),
        })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            key,
            value: value.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}
