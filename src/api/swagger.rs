//! OpenAPI document and Swagger UI.

use axum::extract::State;
use axum::response::{Html, Response};

use crate::http::response::json_ok;
use crate::http::server::AppState;
use crate::routing::openapi::{self, API_TITLE};

/// Swagger UI release loaded from the CDN.
const SWAGGER_UI_VERSION: &str = "5.18.2";

/// Where the UI fetches the document from.
pub const DOCUMENT_PATH: &str = "/swagger.json";

/// OpenAPI document.
#[utoipa::path(
    get,
    path = "/swagger.json",
    tag = "HTTP API",
    responses((status = 200, description = "OpenAPI document", content_type = "application/json"))
)]
pub async fn document(State(state): State<AppState>) -> Response {
    json_ok(&openapi::service_document(&state.build))
}

/// Interactive API browser.
#[utoipa::path(
    get,
    path = "/swagger/",
    tag = "HTTP API",
    responses((status = 200, description = "Swagger UI", content_type = "text/html"))
)]
pub async fn ui() -> Html<String> {
    Html(ui_page(DOCUMENT_PATH))
}

/// Swagger UI page rendering the document at `document_url`.
pub fn ui_page(document_url: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Swagger UI</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui.css" />
    <style>
        body {{
            margin: 0;
            background: #fafafa;
        }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            window.ui = SwaggerUIBundle({{
                url: "{document_url}",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            }});
        }};
    </script>
</body>
</html>"##,
        title = API_TITLE,
        version = SWAGGER_UI_VERSION,
        document_url = document_url,
    )
}
