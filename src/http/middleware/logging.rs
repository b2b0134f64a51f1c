//! Request logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::http::header::USER_AGENT;
use axum::middleware::Next;
use axum::response::Response;

use crate::http::request::{remote_addr, request_id, X_REQUEST_ID};

/// Log each request at debug level and echo its request ID.
pub async fn log_request(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let id = request_id(request.headers());
    request.headers_mut().insert(X_REQUEST_ID.clone(), id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let request_id = id.to_str().unwrap_or("invalid").to_owned();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        proto = ?request.version(),
        remote = ?remote_addr(&request),
        user_agent = %user_agent,
        "Request started"
    );

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID.clone(), id);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}
