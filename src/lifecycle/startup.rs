//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the termination signal handlers
//! - Hand the validated config to the HTTP server
//! - Block until the server has shut down
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Signal handlers are installed before the listener is bound

use std::io;

use crate::build_info::BuildInfo;
use crate::config::ServiceConfig;
use crate::http::server::{HttpServer, ServerError};
use crate::lifecycle::{CloseSignal, SignalListener};

/// Process exit code for fatal runtime errors.
pub const EXIT_RUNTIME: u8 = 1;
/// Process exit code when the command line cannot be parsed.
pub const EXIT_USAGE: u8 = 2;
/// Process exit code when the configuration cannot be loaded or is invalid.
pub const EXIT_CONFIG: u8 = 3;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Run the service until a termination signal has been handled.
pub async fn run(config: ServiceConfig, build: BuildInfo) -> Result<(), StartupError> {
    tracing::info!(
        version = %build.version,
        revision = %build.revision,
        hostname = %config.hostname,
        port = config.port,
        "Starting bricks-backend"
    );

    let close = CloseSignal::new();
    let signals = SignalListener::install().map_err(StartupError::Signals)?;
    let signal_task = signals.spawn(close.clone());

    let server = HttpServer::new(config, build);
    let result = server.listen_and_serve(close).await;
    signal_task.abort();

    result?;
    tracing::info!("Shutdown complete");
    Ok(())
}
