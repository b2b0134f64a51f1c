//! Version-tagging middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use crate::build_info::BuildInfo;

pub static X_API_VERSION: HeaderName = HeaderName::from_static("x-api-version");
pub static X_API_REVISION: HeaderName = HeaderName::from_static("x-api-revision");

/// Stamp the build version and revision on the request and the response.
pub async fn tag_version(
    State(build): State<Arc<BuildInfo>>,
    mut request: Request,
    next: Next,
) -> Response {
    stamp(request.headers_mut(), &build);
    let mut response = next.run(request).await;
    stamp(response.headers_mut(), &build);
    response
}

fn stamp(headers: &mut HeaderMap, build: &BuildInfo) {
    if let Ok(version) = HeaderValue::from_str(&build.version) {
        headers.insert(X_API_VERSION.clone(), version);
    }
    if let Ok(revision) = HeaderValue::from_str(&build.revision) {
        headers.insert(X_API_REVISION.clone(), revision);
    }
}
