//! Dispatch table onto the API handlers.

use axum::routing::{get, post};
use axum::Router;

use crate::api::{env, health, info, swagger, token};
use crate::http::server::AppState;

/// Build the router with every endpoint of [`ApiDoc`](crate::routing::openapi::ApiDoc).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(info::index))
        .route("/api/info", get(info::info))
        .route("/version", get(info::version))
        .route("/env", get(env::env).post(env::env))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/readyz/enable", post(health::enable_ready))
        .route("/readyz/disable", post(health::disable_ready))
        .route("/token", post(token::issue))
        .route("/token/validate", get(token::validate))
        .route("/swagger.json", get(swagger::document))
        .route("/swagger/", get(swagger::ui))
        .route("/swagger/index.html", get(swagger::ui))
        .route("/swagger/doc.json", get(swagger::document))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_info::BuildInfo;
    use crate::config::ServiceConfig;
    use crate::routing::openapi::{operations, ApiDoc};
    use utoipa::OpenApi;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let state = AppState::new(&ServiceConfig::default(), BuildInfo::new("0.1.0", "unknown"));
        build_router(state)
    }

    #[tokio::test]
    async fn every_documented_operation_is_routed() {
        for (method, path) in operations(&ApiDoc::openapi()) {
            let request = Request::builder()
                .method(Method::from_bytes(method.as_bytes()).unwrap())
                .uri(path.as_str())
                .body(Body::empty())
                .unwrap();
            let status = router().oneshot(request).await.unwrap().status();
            assert_ne!(status, StatusCode::NOT_FOUND, "{method} {path}");
            assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
        }
    }

    #[tokio::test]
    async fn swagger_ui_and_document_are_served() {
        for path in ["/swagger/", "/swagger/index.html"] {
            let response = router()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            let content_type = response.headers()["content-type"].to_str().unwrap();
            assert!(content_type.starts_with("text/html"), "{path}");
        }

        for path in ["/swagger.json", "/swagger/doc.json"] {
            let response = router()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(doc["info"]["version"], "0.1.0", "{path}");
            assert!(doc["paths"]["/healthz"].is_object(), "{path}");
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let request = Request::get("/nope").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let request = Request::delete("/healthz").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
