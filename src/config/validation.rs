//! Configuration validation.
//!
//! Semantic checks run after all sources are merged. Every problem is
//! reported, not just the first one.

use std::time::Duration;

use crate::config::schema::ServiceConfig;
use crate::observability::logging::parse_level;

/// A single semantic problem in the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("unknown log level {0:?}")]
    LogLevel(String),

    #[error("backend url {url:?} must use http or https")]
    BackendScheme { url: String },

    #[error("jwt-secret must not be empty")]
    EmptySecret,
}

/// Validate a merged configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let timeouts = [
        ("http-client-timeout", config.http_client_timeout),
        ("http-server-timeout", config.http_server_timeout),
        ("http-server-shutdown-timeout", config.http_server_shutdown_timeout),
    ];
    for (field, value) in timeouts {
        if value == Duration::ZERO {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if parse_level(&config.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.log_level.clone()));
    }

    for url in &config.backend_urls {
        if !matches!(url.scheme(), "http" | "https") {
            errors.push(ValidationError::BackendScheme {
                url: url.to_string(),
            });
        }
    }

    if config.jwt_secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let config = ServiceConfig {
            http_server_timeout: Duration::ZERO,
            log_level: "verbose".into(),
            backend_urls: vec!["ftp://files.local/".parse().unwrap()],
            jwt_secret: String::new(),
            ..ServiceConfig::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroTimeout {
                    field: "http-server-timeout"
                },
                ValidationError::LogLevel("verbose".into()),
                ValidationError::BackendScheme {
                    url: "ftp://files.local/".into()
                },
                ValidationError::EmptySecret,
            ]
        );
    }
}
