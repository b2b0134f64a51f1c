//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGINT and SIGTERM handlers before the server starts
//! - Translate the first signal into the close event
//! - A second signal forces the process out with exit code 1
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are installed eagerly so failures surface at startup

use std::io;

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::CloseSignal;

/// Exit code used when a second signal interrupts the drain.
pub const FORCED_EXIT_CODE: i32 = 1;

/// Installed termination signal handlers.
pub struct SignalListener {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl SignalListener {
    /// Register the handlers. Fails if the OS refuses the registration.
    pub fn install() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Wait for the next termination signal.
    pub async fn recv(&mut self) {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => tracing::debug!(signal = "SIGINT", "Signal received"),
                _ = self.terminate.recv() => tracing::debug!(signal = "SIGTERM", "Signal received"),
            }
        }
        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    }

    /// Fire `close` on the first signal; exit the process on the second.
    pub fn spawn(mut self, close: CloseSignal) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.recv().await;
            tracing::info!("Termination signal received, starting graceful shutdown");
            close.trigger();

            self.recv().await;
            tracing::warn!("Second termination signal received, forcing exit");
            std::process::exit(FORCED_EXIT_CODE);
        })
    }
}
