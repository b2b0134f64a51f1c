//! Demo token endpoints.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::http::response::{json_ok, ApiError, ErrorBody};
use crate::http::server::AppState;
use crate::security::{bearer_token, TokenError};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenValidationResponse {
    pub token_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue a token whose subject is the request body.
#[utoipa::path(
    post,
    path = "/token",
    tag = "HTTP API",
    request_body(content = String, description = "Token subject", content_type = "text/plain"),
    responses(
        (status = 200, description = "OK", body = TokenResponse),
        (status = 500, description = "Signing failed", body = ErrorBody)
    )
)]
pub async fn issue(State(state): State<AppState>, body: String) -> Response {
    let subject = match body.trim() {
        "" => "anonymous",
        subject => subject,
    };

    match state.tokens.issue(subject) {
        Ok(issued) => json_ok(&TokenResponse {
            token: issued.token,
            expires_at: issued.expires_at,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Token issue failed");
            ApiError::internal(e.to_string()).into_response()
        }
    }
}

/// Validate the bearer token of the request.
#[utoipa::path(
    get,
    path = "/token/validate",
    tag = "HTTP API",
    params(("Authorization" = String, Header, description = "Bearer token")),
    responses(
        (status = 200, description = "OK", body = TokenValidationResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn validate(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
    else {
        return ApiError::unauthorized("authorization bearer header required").into_response();
    };

    match state.tokens.validate(token) {
        Ok(claims) => json_ok(&TokenValidationResponse {
            expires_at: claims.expires_at(),
            token_name: claims.name,
        }),
        Err(e @ TokenError::Expired) | Err(e @ TokenError::Invalid(_)) => {
            tracing::debug!(error = %e, "Token rejected");
            ApiError::unauthorized(e.to_string()).into_response()
        }
        Err(e) => ApiError::internal(e.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_info::BuildInfo;
    use crate::config::ServiceConfig;
    use crate::routing::build_router;
    use crate::security::TokenIssuer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    fn router() -> Router {
        let state = AppState::new(&ServiceConfig::default(), BuildInfo::new("0.1.0", "unknown"));
        build_router(state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn issue_token(router: &Router, subject: &str) -> TokenResponse {
        let request = Request::post("/token")
            .body(Body::from(subject.to_string()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_value(body_json(response).await).unwrap()
    }

    async fn validate_with(router: &Router, authorization: Option<String>) -> Response {
        let mut request = Request::get("/token/validate");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn issued_token_validates() {
        let router = router();
        let issued = issue_token(&router, "test-user").await;
        assert!(!issued.token.is_empty());

        let response = validate_with(&router, Some(format!("Bearer {}", issued.token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: TokenValidationResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.token_name, "test-user");
        assert_eq!(body.expires_at.timestamp(), issued.expires_at.timestamp());
    }

    #[tokio::test]
    async fn empty_body_issues_anonymous_token() {
        let router = router();
        let issued = issue_token(&router, "  ").await;
        let response = validate_with(&router, Some(format!("Bearer {}", issued.token))).await;
        let body = body_json(response).await;
        assert_eq!(body["token_name"], "anonymous");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let response = validate_with(&router(), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], 401);
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        let router = router();
        let issued = issue_token(&router, "test-user").await;
        let foreign = TokenIssuer::new("someone-else").issue("test-user").unwrap();

        let mut parts: Vec<String> = issued.token.split('.').map(str::to_string).collect();
        parts[2] = foreign.token.rsplit('.').next().unwrap().to_string();
        let tampered = parts.join(".");

        let response = validate_with(&router, Some(format!("Bearer {tampered}"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let router = router();
        let secret = ServiceConfig::default().jwt_secret;
        let expired = TokenIssuer::new(&secret)
            .issue_at("test-user", Utc::now() - chrono::Duration::minutes(10))
            .unwrap();

        let response = validate_with(&router, Some(format!("Bearer {}", expired.token))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "token has expired");
    }
}
