//! Environment dump.

use axum::response::Response;

use crate::http::response::json_ok;

/// Process environment as `KEY=VALUE` strings, in OS order.
pub fn environment() -> Vec<String> {
    std::env::vars_os()
        .map(|(key, value)| format!("{}={}", key.to_string_lossy(), value.to_string_lossy()))
        .collect()
}

/// Environment variables.
#[utoipa::path(
    method(get, post),
    path = "/env",
    tag = "HTTP API",
    responses((status = 200, description = "OK", body = [String]))
)]
pub async fn env() -> Response {
    json_ok(&environment())
}
