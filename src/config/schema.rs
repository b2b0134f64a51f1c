//! Configuration schema definitions.
//!
//! `ServiceConfig` is the merged, validated result handed to the server.
//! `FileConfig` mirrors the optional TOML file, where every key may be
//! omitted and durations are written the same way as on the command line.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Port value meaning "do not bind a listener".
pub const DISABLED_PORT: u16 = 0;

/// Root configuration of the service. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Host to bind to; empty means all interfaces.
    pub host: String,

    /// Port to bind to; `0` disables the listener entirely.
    pub port: u16,

    /// Log level: debug, info, warn, error, fatal or panic.
    pub log_level: String,

    /// Backend service URLs.
    pub backend_urls: Vec<Url>,

    /// Timeout for outbound HTTP calls.
    pub http_client_timeout: Duration,

    /// Per-request read/write timeout of the server.
    pub http_server_timeout: Duration,

    /// Deadline for draining connections on shutdown.
    pub http_server_shutdown_timeout: Duration,

    /// Directory searched for the config file.
    pub config_path: PathBuf,

    /// Config file name inside `config_path`.
    pub config_file: String,

    /// Accept HTTP/2 over cleartext in addition to HTTP/1.1.
    pub h2c: bool,

    /// Never report healthy (orchestrator testing).
    pub unhealthy: bool,

    /// Never report ready on startup (orchestrator testing).
    pub unready: bool,

    /// Shared secret for the demo token endpoints.
    pub jwt_secret: String,

    /// Hostname reported by `/api/info`. Resolved by the loader.
    pub hostname: String,
}

impl ServiceConfig {
    /// Whether the configured port is the "do not bind" sentinel.
    pub fn is_bind_disabled(&self) -> bool {
        self.port == DISABLED_PORT
    }

    /// Host used for binding, with the empty host meaning all interfaces.
    pub fn bind_host(&self) -> &str {
        if self.host.is_empty() {
            "0.0.0.0"
        } else {
            &self.host
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 9898,
            log_level: "debug".to_string(),
            backend_urls: Vec::new(),
            http_client_timeout: Duration::from_secs(120),
            http_server_timeout: Duration::from_secs(30),
            http_server_shutdown_timeout: Duration::from_secs(5),
            config_path: PathBuf::from("."),
            config_file: "config.toml".to_string(),
            h2c: false,
            unhealthy: false,
            unready: false,
            // WARNING: demo value, override via BRICKS_BACKEND_POC_JWT_SECRET.
            jwt_secret: "elarbolgigante".to_string(),
            hostname: "localhost".to_string(),
        }
    }
}

/// Contents of the optional config file. Keys use the flag names.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub backend_url: Option<Vec<String>>,
    pub http_client_timeout: Option<String>,
    pub http_server_timeout: Option<String>,
    pub http_server_shutdown_timeout: Option<String>,
    pub h2c: Option<bool>,
    pub unhealthy: Option<bool>,
    pub unready: Option<bool>,
    pub jwt_secret: Option<String>,
}

/// Parse a human duration such as `30s`, `2m` or `1h30m`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    duration_str::parse(value.trim()).map_err(|e| e.to_string())
}
