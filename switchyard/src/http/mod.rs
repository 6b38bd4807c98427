//! HTTP surface: the ingress fallback, documentation routes and request
//! tracing, assembled into one axum router.

mod docs;
mod ingress;

pub use docs::{DOCS_PATH, OPENAPI_PATH, routes as docs_routes};
pub use ingress::{Ingress, event_from_request, response_for};

use crate::{Dispatcher, config::HttpSettings};
use axum::{Router, extract::DefaultBodyLimit, http::Request};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// Documentation routes are served directly when enabled; every other
/// request goes through [`Ingress`]. Bodies larger than
/// `settings.max_body_bytes` are rejected with `413`.
pub fn app(dispatcher: Arc<Dispatcher>, settings: &HttpSettings) -> Router {
    let ingress = Arc::new(Ingress::new(dispatcher));

    let mut router = Router::new();
    if settings.docs_enabled {
        router = router.merge(docs::routes());
    }

    router
        .fallback(ingress::fallback)
        .with_state(ingress)
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}
