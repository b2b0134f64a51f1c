//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config loaded → Install signal handlers → Bind → Serve → Raise flags
//!
//! Shutdown (shutdown.rs):
//!     Close signal → Flags down → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Close signal
//!     Second signal → Forced exit
//! ```
//!
//! # Design Decisions
//! - Liveness and readiness live in one atomic word (state.rs)
//! - Once shutdown starts the flags can never be raised again
//! - Shutdown has a deadline: drain is abandoned once it expires

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::CloseSignal;
pub use signals::SignalListener;
pub use startup::{run, StartupError};
pub use state::LifecycleState;
