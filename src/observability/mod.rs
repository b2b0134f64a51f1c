//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! logging.rs:
//!     → EnvFilter (configured level, RUST_LOG override)
//!     → JSON formatter on stderr
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through the request logging middleware
//! - The library never installs a subscriber; only the binary does

pub mod logging;

pub use logging::{init_logging, LoggingError};
