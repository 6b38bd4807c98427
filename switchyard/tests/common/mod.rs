#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use std::sync::Arc;
use switchyard::{
    Dispatcher, HandlerError, Invocation, Kind, RegistryBuilder, RegistryHandle, Reply, Route,
    config::HttpSettings, http,
};

// ============================================================================
// Fixtures
// ============================================================================

/// HTTP settings with docs enabled and a body limit of `max_body_bytes`.
pub fn settings(max_body_bytes: usize) -> HttpSettings {
    HttpSettings {
        max_body_bytes,
        docs_enabled: true,
    }
}

/// A dispatcher over the built-in kinds plus `routes`, all of kind `http`.
pub fn dispatcher(routes: Vec<Route>) -> Arc<Dispatcher> {
    let mut builder = RegistryBuilder::with_builtin_kinds();
    for route in routes {
        builder.register_handler(&Kind::HTTP, route).unwrap();
    }
    Arc::new(Dispatcher::new(RegistryHandle::new(builder.build())))
}

/// The application router over `routes` with default settings.
pub fn app(routes: Vec<Route>) -> Router {
    http::app(dispatcher(routes), &settings(2 * 1024 * 1024))
}

/// A route replying `200` with `payload`.
pub fn replying(name: &'static str, spec: &str, payload: &'static str) -> Route {
    Route::new(name, spec, move |_: Invocation| async move {
        Ok::<_, HandlerError>(Reply::ok(payload))
    })
}

// ============================================================================
// Requests
// ============================================================================

/// A request with an empty body.
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
