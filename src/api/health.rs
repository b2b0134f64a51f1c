//! Kubernetes liveness and readiness endpoints.
//!
//! - `/healthz` - Liveness: should the process be left running?
//! - `/readyz` - Readiness: should the process receive traffic?
//! - `/readyz/enable`, `/readyz/disable` - operator toggles for readiness

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::http::response::json_ok;
use crate::http::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeStatus {
    pub status: String,
}

fn probe(up: bool) -> Response {
    if up {
        json_ok(&ProbeStatus {
            status: "OK".to_string(),
        })
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK while healthy, 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Kubernetes",
    responses(
        (status = 200, description = "Healthy", body = ProbeStatus),
        (status = 503, description = "Not healthy")
    )
)]
pub async fn healthz(State(state): State<AppState>) -> Response {
    probe(state.lifecycle.is_healthy())
}

/// Readiness probe handler.
///
/// Returns 200 OK while ready, 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = "/readyz",
    tag = "Kubernetes",
    responses(
        (status = 200, description = "Ready", body = ProbeStatus),
        (status = 503, description = "Not ready")
    )
)]
pub async fn readyz(State(state): State<AppState>) -> Response {
    probe(state.lifecycle.is_ready())
}

/// Put the instance back into rotation. Ignored once shutdown began.
#[utoipa::path(
    post,
    path = "/readyz/enable",
    tag = "Kubernetes",
    responses((status = 202, description = "Accepted"))
)]
pub async fn enable_ready(State(state): State<AppState>) -> StatusCode {
    state.lifecycle.set_ready(true);
    tracing::info!(ready = state.lifecycle.is_ready(), "Readiness enabled");
    StatusCode::ACCEPTED
}

/// Take the instance out of rotation while keeping it alive.
#[utoipa::path(
    post,
    path = "/readyz/disable",
    tag = "Kubernetes",
    responses((status = 202, description = "Accepted"))
)]
pub async fn disable_ready(State(state): State<AppState>) -> StatusCode {
    state.lifecycle.set_ready(false);
    tracing::info!("Readiness disabled");
    StatusCode::ACCEPTED
}
