//! Backend HTTP service scaffold.
//!
//! Serves liveness and readiness probes, build and runtime metadata, an
//! environment dump and a demo token flow, and shuts down gracefully on
//! SIGINT/SIGTERM.

pub mod api;
pub mod build_info;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;

pub use build_info::BuildInfo;
pub use config::{load_config, Cli, ConfigError, ServiceConfig};
pub use http::{HttpServer, ServerError, ServerPhase};
pub use lifecycle::{CloseSignal, LifecycleState};
