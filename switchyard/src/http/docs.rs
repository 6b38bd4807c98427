//! Embedded API documentation.

use axum::{
    Router,
    http::header,
    response::IntoResponse,
    routing::get,
};

const INDEX_HTML: &[u8] = include_bytes!("../../assets/docs/index.html");
const OPENAPI_YAML: &[u8] = include_bytes!("../../assets/docs/openapi.yaml");

/// The documentation page path.
pub const DOCS_PATH: &str = "/docs";
/// The OpenAPI document path.
pub const OPENAPI_PATH: &str = "/docs/openapi.yaml";

/// Routes serving the documentation page and the OpenAPI document.
///
/// Only `GET` (and therefore `HEAD`) is routed; other methods get `405`.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(DOCS_PATH, get(docs_page))
        .route(OPENAPI_PATH, get(openapi_spec))
}

async fn docs_page() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        INDEX_HTML,
    )
}

async fn openapi_spec() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/yaml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        OPENAPI_YAML,
    )
}
