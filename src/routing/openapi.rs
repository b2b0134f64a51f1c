//! OpenAPI document derived from the handler annotations.

use utoipa::openapi::path::PathItem;
use utoipa::OpenApi;

use crate::api;
use crate::build_info::BuildInfo;

pub const API_TITLE: &str = "Bricks Backend POC API";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bricks Backend POC API",
        description = "Microservice template for Kubernetes.",
        license(name = "MIT License")
    ),
    paths(
        api::info::index,
        api::info::info,
        api::info::version,
        api::env::env,
        api::health::healthz,
        api::health::readyz,
        api::health::enable_ready,
        api::health::disable_ready,
        api::token::issue,
        api::token::validate,
        api::swagger::document,
        api::swagger::ui,
    ),
    tags(
        (name = "HTTP API", description = "Informational and demo endpoints"),
        (name = "Kubernetes", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Document for the running build.
pub fn service_document(build: &BuildInfo) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.version = build.version.clone();
    doc
}

/// Every documented `(method, path)` pair, in path order.
pub fn operations(doc: &utoipa::openapi::OpenApi) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    for (path, item) in &doc.paths.paths {
        for method in methods(item) {
            out.push((method, path.clone()));
        }
    }
    out
}

fn methods(item: &PathItem) -> impl Iterator<Item = &'static str> + '_ {
    [
        ("GET", &item.get),
        ("POST", &item.post),
        ("PUT", &item.put),
        ("PATCH", &item.patch),
        ("DELETE", &item.delete),
        ("HEAD", &item.head),
        ("OPTIONS", &item.options),
        ("TRACE", &item.trace),
    ]
    .into_iter()
    .filter(|(_, operation)| operation.is_some())
    .map(|(method, _)| method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_carries_build_version() {
        let doc = service_document(&BuildInfo::new("0.1.0", "unknown"));
        assert_eq!(doc.info.title, API_TITLE);
        assert_eq!(doc.info.version, "0.1.0");
    }

    #[test]
    fn every_endpoint_is_documented() {
        let doc = service_document(&BuildInfo::new("0.1.0", "unknown"));
        let ops = operations(&doc);
        for expected in [
            ("GET", "/"),
            ("GET", "/api/info"),
            ("GET", "/version"),
            ("GET", "/env"),
            ("POST", "/env"),
            ("GET", "/healthz"),
            ("GET", "/readyz"),
            ("POST", "/readyz/enable"),
            ("POST", "/readyz/disable"),
            ("POST", "/token"),
            ("GET", "/token/validate"),
            ("GET", "/swagger.json"),
            ("GET", "/swagger/"),
        ] {
            assert!(
                ops.iter().any(|(m, p)| *m == expected.0 && p == expected.1),
                "{} {} missing",
                expected.0,
                expected.1
            );
        }
        assert_eq!(ops.len(), 13);
    }

    #[test]
    fn serialized_document_keeps_response_codes() {
        let doc = service_document(&BuildInfo::new("0.1.0", "unknown"));
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["openapi"].as_str().unwrap().starts_with("3."));
        assert!(json["paths"]["/healthz"]["get"]["responses"]["503"].is_object());
        assert!(json["paths"]["/token/validate"]["get"]["responses"]["401"].is_object());
        assert!(json["components"]["schemas"]["TokenResponse"].is_object());
    }
}
