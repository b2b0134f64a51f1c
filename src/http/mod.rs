//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper connection, drain on close)
//!     → middleware/ (request ID, version headers, timeout)
//!     → routing/ → api/ handlers
//!     → response.rs (JSON encoding, error bodies)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError, ServerPhase};
