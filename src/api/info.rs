//! Runtime and version information.

use axum::extract::State;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::http::response::json_ok;
use crate::http::server::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RuntimeInfo {
    pub hostname: String,
    pub version: String,
    pub revision: String,
    pub os: String,
    pub arch: String,
    pub runtime: String,
    /// Async tasks alive on the runtime.
    pub num_tasks: usize,
    /// Logical CPUs available to the process.
    pub num_cpu: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct VersionInfo {
    pub version: String,
    pub commit: String,
}

/// Runtime information.
#[utoipa::path(
    get,
    path = "/",
    tag = "HTTP API",
    responses((status = 200, description = "OK", body = RuntimeInfo))
)]
pub async fn index(state: State<AppState>) -> Response {
    info(state).await
}

/// Runtime information.
#[utoipa::path(
    get,
    path = "/api/info",
    tag = "HTTP API",
    responses((status = 200, description = "OK", body = RuntimeInfo))
)]
pub async fn info(State(state): State<AppState>) -> Response {
    let info = RuntimeInfo {
        hostname: state.hostname.to_string(),
        version: state.build.version.clone(),
        revision: state.build.revision.clone(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        runtime: "tokio".to_string(),
        num_tasks: tokio::runtime::Handle::current()
            .metrics()
            .num_alive_tasks(),
        num_cpu: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
    };
    json_ok(&info)
}

/// Version and git commit.
#[utoipa::path(
    get,
    path = "/version",
    tag = "HTTP API",
    responses((status = 200, description = "OK", body = VersionInfo))
)]
pub async fn version(State(state): State<AppState>) -> Response {
    json_ok(&VersionInfo {
        version: state.build.version.clone(),
        commit: state.build.revision.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_info::BuildInfo;
    use crate::config::ServiceConfig;
    use crate::routing::build_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json<T: serde::de::DeserializeOwned>(path: &str) -> T {
        let state = AppState::new(&ServiceConfig::default(), BuildInfo::new("0.1.0", "unknown"));
        let response = build_router(state)
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn version_reports_injected_build() {
        let version: VersionInfo = get_json("/version").await;
        assert_eq!(
            version,
            VersionInfo {
                version: "0.1.0".into(),
                commit: "unknown".into(),
            }
        );
    }

    #[tokio::test]
    async fn info_describes_the_process() {
        let info: RuntimeInfo = get_json("/api/info").await;
        assert_eq!(info.hostname, "localhost");
        assert_eq!(info.version, "0.1.0");
        assert_eq!(info.revision, "unknown");
        assert_eq!(info.os, std::env::consts::OS);
        assert_eq!(info.arch, std::env::consts::ARCH);
        assert!(info.num_cpu >= 1);
    }

    #[tokio::test]
    async fn root_serves_info() {
        let info: RuntimeInfo = get_json("/").await;
        assert_eq!(info.version, "0.1.0");
    }
}
