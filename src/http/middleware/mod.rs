//! Middleware stack.
//!
//! Layers are applied in one place so their order is explicit. Outermost
//! first, a request passes through:
//!
//! ```text
//! log_request → tag_version → timeout → route handler
//! ```

pub mod logging;
pub mod version;

use std::time::Duration;

use axum::http::StatusCode;
use axum::{middleware, Router};
use tower_http::timeout::TimeoutLayer;

use crate::http::server::AppState;

pub use logging::log_request;
pub use version::{tag_version, X_API_REVISION, X_API_VERSION};

/// Wrap `router` with the request timeout, version tags and request logging.
pub fn compose(router: Router, state: &AppState, request_timeout: Duration) -> Router {
    let timed = router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        request_timeout,
    ));
    let tagged = timed.layer(middleware::from_fn_with_state(
        state.build.clone(),
        tag_version,
    ));
    tagged.layer(middleware::from_fn(log_request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_info::BuildInfo;
    use crate::config::ServiceConfig;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    fn app(request_timeout: Duration) -> Router {
        let state = AppState::new(&ServiceConfig::default(), BuildInfo::new("0.1.0", "abc"));
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "done"
            }),
        );
        compose(router, &state, request_timeout)
    }

    #[tokio::test]
    async fn slow_handler_times_out_with_408() {
        let response = app(Duration::from_millis(50))
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        // Outer layers still tag the timeout response.
        assert_eq!(response.headers()[&X_API_VERSION], "0.1.0");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn fast_handler_is_untouched() {
        let response = app(Duration::from_secs(5))
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
