//! Tower integration.
//!
//! [`DispatchService`] exposes a [`Dispatcher`] as a `tower::Service` over
//! shared events, so tower middleware (timeouts, rate limits, buffering) can
//! wrap dispatch like any other service.
//!
//! ```rust,ignore
//! use switchyard::service::DispatchService;
//! use tower::ServiceExt;
//!
//! let service = DispatchService::new(dispatcher);
//! let outcome = service.oneshot(HttpEvent::new("GET", "/").into_shared()).await?;
//! ```

use crate::{DispatchError, Dispatcher, Outcome, SharedEvent};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

/// A [`Dispatcher`] as a `tower::Service<SharedEvent>`.
#[derive(Debug, Clone)]
pub struct DispatchService {
    dispatcher: Arc<Dispatcher>,
}

impl DispatchService {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: impl Into<Arc<Dispatcher>>) -> Self {
        Self {
            dispatcher: dispatcher.into(),
        }
    }

    /// The wrapped dispatcher.
    pub fn inner(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

impl Service<SharedEvent> for DispatchService {
    type Response = Outcome;
    type Error = DispatchError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Concurrency is bounded inside the dispatcher.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: SharedEvent) -> Self::Future {
        let dispatcher = Arc::clone(&self.dispatcher);
        Box::pin(async move { dispatcher.dispatch(event).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerError, HttpEvent, Invocation, Kind, RegistryBuilder, RegistryHandle, Reply, Route};
    use tower::ServiceExt;

    fn dispatcher() -> Dispatcher {
        let mut builder = RegistryBuilder::with_builtin_kinds();
        builder
            .register_handler(
                &Kind::HTTP,
                Route::new("hello", "GET /hello", |_: Invocation| async {
                    Ok::<_, HandlerError>(Reply::ok("hi"))
                }),
            )
            .unwrap();
        Dispatcher::new(RegistryHandle::new(builder.build()))
    }

    #[tokio::test]
    async fn dispatches_through_tower() {
        let service = DispatchService::new(dispatcher());

        let outcome = service
            .clone()
            .oneshot(HttpEvent::new("GET", "/hello").into_shared())
            .await
            .unwrap();
        assert_eq!(outcome.reply().map(|r| r.payload().as_ref()), Some(&b"hi"[..]));

        let err = service
            .oneshot(HttpEvent::new("GET", "/missing").into_shared())
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::NoMatch { .. }));
    }
}
