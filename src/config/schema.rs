//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default HTTP port of the status service.
pub const DEFAULT_PORT: u16 = 8001;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Status service (HTTP dashboard) settings.
    pub status: StatusConfig,

    /// Built-in watcher settings.
    pub watch: WatchConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Status service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    /// IP address to bind (e.g., "0.0.0.0" for every interface).
    pub bind_host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Directory tree served under `/assets/`.
    pub assets_dir: PathBuf,

    /// Directory holding `*.html` templates.
    pub templates_dir: PathBuf,

    /// Template rendered for `/`.
    pub default_template: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            assets_dir: PathBuf::from("./assets"),
            templates_dir: PathBuf::from("./templates"),
            default_template: "interfaces.html".to_string(),
        }
    }
}

/// Built-in link watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// How often each watcher samples its interface, in milliseconds.
    pub poll_interval_ms: u64,
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directives (e.g., "info", "locutus=debug,tower_http=info").
    pub log_level: String,

    /// Pretty or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
