//! HTTP ingress: requests in, dispatch outcomes out.

use crate::{DispatchError, Dispatcher, HttpEvent, InvocationError, Outcome};
use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Converts HTTP requests into [`HttpEvent`]s and dispatch results into
/// responses.
///
/// Mounted as the fallback of the router built by [`app`](super::app), so
/// every request not claimed by a built-in route is dispatched.
#[derive(Debug, Clone)]
pub struct Ingress {
    dispatcher: Arc<Dispatcher>,
}

impl Ingress {
    /// Create an ingress over a dispatcher.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// The dispatcher requests are handed to.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Dispatch one request.
    pub async fn handle(&self, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
        let head = method == Method::HEAD;
        let event = event_from_request(&method, &uri, &headers, body);
        let result = self.dispatcher.dispatch(event.into_shared()).await;
        let response = response_for(result);
        if head { strip_body(response) } else { response }
    }
}

/// Axum fallback handler.
pub(crate) async fn fallback(
    State(ingress): State<Arc<Ingress>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    ingress.handle(method, uri, headers, body).await
}

/// Normalize a request into an event.
pub fn event_from_request(method: &Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> HttpEvent {
    let mut event = HttpEvent::new(method.as_str(), uri.path()).with_query(uri.query());
    for (name, value) in headers {
        match value.to_str() {
            Ok(value) => event = event.with_header(name.as_str(), value),
            Err(_) => warn!(header = %name, "dropping non-text header value"),
        }
    }
    event.with_body(body)
}

/// Map a dispatch result onto a response.
///
/// | Result                                 | Status |
/// |----------------------------------------|--------|
/// | success                                | reply status (invalid: 500) |
/// | no handler matched                     | 404    |
/// | kind not registered                    | 500    |
/// | fatal handler failure                  | 500    |
/// | every candidate timed out              | 504    |
/// | every candidate failed otherwise       | 502    |
pub fn response_for(result: Result<Outcome, DispatchError>) -> Response {
    match result {
        Ok(outcome) => match outcome.reply() {
            Some(reply) => {
                let status =
                    StatusCode::from_u16(reply.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let mut response = (status, Body::from(reply.payload().clone())).into_response();
                if let Some(value) = reply
                    .content_type()
                    .and_then(|ct| HeaderValue::from_str(ct).ok())
                {
                    response.headers_mut().insert(header::CONTENT_TYPE, value);
                }
                response
            }
            None => StatusCode::NO_CONTENT.into_response(),
        },
        Err(err) => {
            let (status, code) = classify(&err);
            let body = Json(json!({ "error": err.to_string(), "kind": code }));
            (status, body).into_response()
        }
    }
}

fn classify(err: &DispatchError) -> (StatusCode, &'static str) {
    match err {
        DispatchError::NoMatch { .. } => (StatusCode::NOT_FOUND, "no_match"),
        DispatchError::UnknownKind(_) => (StatusCode::INTERNAL_SERVER_ERROR, "unknown_kind"),
        DispatchError::Fatal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "fatal"),
        DispatchError::Exhausted { attempts, .. }
            if !attempts.is_empty()
                && attempts
                    .iter()
                    .all(|a| a.error().is_some_and(InvocationError::is_timeout)) =>
        {
            (StatusCode::GATEWAY_TIMEOUT, "timeout")
        }
        DispatchError::Exhausted { .. } => (StatusCode::BAD_GATEWAY, "exhausted"),
        DispatchError::AllFailed { .. } => (StatusCode::BAD_GATEWAY, "all_failed"),
    }
}

fn strip_body(response: Response) -> Response {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Body::empty())
}
