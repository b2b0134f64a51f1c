//! Structured logging.
//!
//! # Responsibilities
//! - Map configured level names onto tracing levels
//! - Install the global subscriber once at startup
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON lines on stderr, one object per event
//! - `RUST_LOG` overrides the configured level when set

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unknown log level {0:?}, expected debug, info, warn, error, fatal or panic")]
    UnknownLevel(String),

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Parse a level name. `fatal` and `panic` collapse onto `error`.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Ok(LevelFilter::ERROR),
        _ => Err(LoggingError::UnknownLevel(level.to_string())),
    }
}

/// Install the global JSON subscriber.
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let level = parse_level(level)?;

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false),
        )
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
