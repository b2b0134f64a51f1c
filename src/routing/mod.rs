//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! #[utoipa::path] annotations on the api handlers
//!     → openapi.rs (ApiDoc, served at /swagger.json and browsed at /swagger/)
//!     → router.rs (exact-path dispatch onto the same handlers)
//!     → logged once at startup
//! ```
//!
//! # Design Decisions
//! - Exact path matching only; no parameters, no prefixes
//! - The document is the list of endpoints; a router test walks it

pub mod openapi;
pub mod router;

use utoipa::OpenApi;

pub use router::build_router;

/// Log every documented route at debug level.
pub fn log_routes() {
    for (method, path) in openapi::operations(&openapi::ApiDoc::openapi()) {
        tracing::debug!(method, path = %path, "Route registered");
    }
}
