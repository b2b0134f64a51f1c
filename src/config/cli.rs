//! Command-line flags and their environment variable bindings.
//!
//! Every option may also be supplied as `BRICKS_BACKEND_POC_<NAME>` with
//! dashes replaced by underscores. An explicit flag wins over the
//! environment, which wins over the config file.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use crate::config::schema::{parse_duration, ServiceConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "bricks-backend", about = "HTTP service scaffold for containerized microservices", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Host to bind service to
    #[arg(long, env = "BRICKS_BACKEND_POC_HOST")]
    pub host: Option<String>,

    /// HTTP port to bind service to (0 disables the listener)
    #[arg(long, env = "BRICKS_BACKEND_POC_PORT")]
    pub port: Option<u16>,

    /// Log level: debug, info, warn, error, fatal or panic
    #[arg(long, env = "BRICKS_BACKEND_POC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Backend service URL (repeatable)
    #[arg(long = "backend-url", env = "BRICKS_BACKEND_POC_BACKEND_URL", value_delimiter = ',')]
    pub backend_url: Vec<String>,

    /// Client timeout duration
    #[arg(long, env = "BRICKS_BACKEND_POC_HTTP_CLIENT_TIMEOUT", value_parser = parse_duration)]
    pub http_client_timeout: Option<Duration>,

    /// Server read and write timeout duration
    #[arg(long, env = "BRICKS_BACKEND_POC_HTTP_SERVER_TIMEOUT", value_parser = parse_duration)]
    pub http_server_timeout: Option<Duration>,

    /// Server graceful shutdown timeout duration
    #[arg(long, env = "BRICKS_BACKEND_POC_HTTP_SERVER_SHUTDOWN_TIMEOUT", value_parser = parse_duration)]
    pub http_server_shutdown_timeout: Option<Duration>,

    /// Config directory path
    #[arg(long, env = "BRICKS_BACKEND_POC_CONFIG_PATH", default_value = ".")]
    pub config_path: PathBuf,

    /// Config file name
    #[arg(long, env = "BRICKS_BACKEND_POC_CONFIG", default_value = "config.toml")]
    pub config: String,

    /// Allow HTTP/2 over cleartext
    #[arg(long, env = "BRICKS_BACKEND_POC_H2C", num_args = 0..=1, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub h2c: Option<bool>,

    /// When set, healthy state is never reached
    #[arg(long, env = "BRICKS_BACKEND_POC_UNHEALTHY", num_args = 0..=1, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub unhealthy: Option<bool>,

    /// When set, ready state is never reached
    #[arg(long, env = "BRICKS_BACKEND_POC_UNREADY", num_args = 0..=1, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub unready: Option<bool>,

    /// Secret used to sign demo tokens
    #[arg(long, env = "BRICKS_BACKEND_POC_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Print version number
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue)]
    pub version: bool,
}

impl Cli {
    /// Path of the config file these flags point at.
    pub fn config_file(&self) -> PathBuf {
        self.config_path.join(&self.config)
    }

    /// Overlay the values that were given as flags or environment variables.
    /// Backend URLs are parsed by the loader.
    pub(crate) fn apply(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(timeout) = self.http_client_timeout {
            config.http_client_timeout = timeout;
        }
        if let Some(timeout) = self.http_server_timeout {
            config.http_server_timeout = timeout;
        }
        if let Some(timeout) = self.http_server_shutdown_timeout {
            config.http_server_shutdown_timeout = timeout;
        }
        if let Some(h2c) = self.h2c {
            config.h2c = h2c;
        }
        if let Some(unhealthy) = self.unhealthy {
            config.unhealthy = unhealthy;
        }
        if let Some(unready) = self.unready {
            config.unready = unready;
        }
        if let Some(secret) = &self.jwt_secret {
            config.jwt_secret = secret.clone();
        }
        config.config_path = self.config_path.clone();
        config.config_file = self.config.clone();
    }
}
