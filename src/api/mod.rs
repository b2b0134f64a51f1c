//! HTTP API handlers.
//!
//! Handlers are stateless apart from reading the lifecycle flags, the
//! build info and the token issuer carried by [`AppState`](crate::http::server::AppState).
//! The readiness toggles are the only handlers that write state.

pub mod env;
pub mod health;
pub mod info;
pub mod swagger;
pub mod token;
