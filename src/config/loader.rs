//! Configuration loading.
//!
//! Sources are layered as defaults, then the optional TOML file, then
//! environment variables and flags (already merged by clap).

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::build_info;
use crate::config::cli::Cli;
use crate::config::schema::{parse_duration, FileConfig, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid duration {value:?} for {field}: {reason}")]
    Duration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid backend url {value:?}: {source}")]
    BackendUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read and deserialize a TOML config file.
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge every configuration source and validate the result.
///
/// The file is optional: a missing file is skipped, an unreadable or
/// malformed one is an error.
pub fn load_config(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = ServiceConfig::default();

    let file_path = cli.config_file();
    let mut backend_urls = Vec::new();
    if file_path.is_file() {
        let file = load_config_file(&file_path)?;
        backend_urls = file.backend_url.clone().unwrap_or_default();
        apply_file(file, &mut config)?;
    }

    cli.apply(&mut config);
    if !cli.backend_url.is_empty() {
        backend_urls = cli.backend_url.clone();
    }
    config.backend_urls = parse_backend_urls(&backend_urls)?;
    config.hostname = build_info::hostname();

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_file(file: FileConfig, config: &mut ServiceConfig) -> Result<(), ConfigError> {
    if let Some(host) = file.host {
        config.host = host;
    }
    if let Some(port) = file.port {
        config.port = port;
    }
    if let Some(level) = file.log_level {
        config.log_level = level;
    }
    if let Some(value) = file.http_client_timeout {
        config.http_client_timeout = duration_field("http-client-timeout", value)?;
    }
    if let Some(value) = file.http_server_timeout {
        config.http_server_timeout = duration_field("http-server-timeout", value)?;
    }
    if let Some(value) = file.http_server_shutdown_timeout {
        config.http_server_shutdown_timeout =
            duration_field("http-server-shutdown-timeout", value)?;
    }
    if let Some(h2c) = file.h2c {
        config.h2c = h2c;
    }
    if let Some(unhealthy) = file.unhealthy {
        config.unhealthy = unhealthy;
    }
    if let Some(unready) = file.unready {
        config.unready = unready;
    }
    if let Some(secret) = file.jwt_secret {
        config.jwt_secret = secret;
    }
    Ok(())
}

fn duration_field(field: &'static str, value: String) -> Result<std::time::Duration, ConfigError> {
    parse_duration(&value).map_err(|reason| ConfigError::Duration {
        field,
        value,
        reason,
    })
}

fn parse_backend_urls(values: &[String]) -> Result<Vec<Url>, ConfigError> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| {
            Url::parse(value).map_err(|source| ConfigError::BackendUrl {
                value: value.to_string(),
                source,
            })
        })
        .collect()
}
