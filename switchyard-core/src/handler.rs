//! # Handlers
//!
//! The terminal unit of work. A handler consumes an [`Invocation`] (the
//! shared event plus whatever the matching strategy captured) and produces a
//! [`Reply`] or a classified [`HandlerError`].
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|inv: Invocation| async move { Ok(Reply::ok("hi")) }`
//! 2. **Struct implementation**: `impl Handler for MyHandler`
//! 3. **Attribute macro**: `#[switchyard::handler(kind = "http", spec = "GET /")]`
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Handler`] uses native `async fn` in traits. The registry stores handlers
//! as [`DynHandler`] trait objects, which every `Handler` implements through a
//! blanket impl.

use crate::{
    error::HandlerError,
    event::SharedEvent,
    kind::Kind,
    outcome::Reply,
};
use bytes::Bytes;
use std::{future::Future, pin::Pin, sync::Arc};

/// What a handler invocation produces.
pub type HandlerResult = Result<Reply, HandlerError>;

/// Values captured by a matching strategy, such as HTTP path parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a captured value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Look up a captured value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over captured values in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The per-invocation context handed to a handler.
///
/// Each invocation gets its own `Invocation`; the only thing shared between
/// concurrent invocations is the immutable event.
#[derive(Debug, Clone)]
pub struct Invocation {
    event: SharedEvent,
    params: Params,
    handler: Arc<str>,
}

impl Invocation {
    /// Create an invocation context.
    pub fn new(event: SharedEvent, params: Params, handler: Arc<str>) -> Self {
        Self {
            event,
            params,
            handler,
        }
    }

    /// The event being dispatched.
    pub fn event(&self) -> &SharedEvent {
        &self.event
    }

    /// The event's kind.
    pub fn kind(&self) -> &Kind {
        self.event.kind()
    }

    /// Look up an event attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.event.attribute(key)
    }

    /// The event payload.
    pub fn payload(&self) -> &Bytes {
        self.event.payload()
    }

    /// Look up a value captured by the matching strategy.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// All captured values.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Name of the handler being invoked.
    pub fn handler_name(&self) -> &str {
        &self.handler
    }
}

/// The terminal endpoint of event dispatch.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a Switchyard handler",
    label = "missing `Handler` implementation",
    note = "Handlers take an `Invocation` and return a future of `HandlerResult`; async closures work too."
)]
pub trait Handler: Send + Sync + 'static {
    /// Executes the handler logic.
    fn call(&self, invocation: Invocation) -> impl Future<Output = HandlerResult> + Send;
}

// Blanket impl for closures
impl<F, Fut> Handler for F
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send,
{
    fn call(&self, invocation: Invocation) -> impl Future<Output = HandlerResult> + Send {
        (self)(invocation)
    }
}

/// Dynamic object-safe version of [`Handler`].
pub trait DynHandler: Send + Sync + 'static {
    /// Executes the handler logic (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>>;
}

impl<T: Handler> DynHandler for T {
    fn call_dyn<'a>(
        &'a self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>> {
        Box::pin(self.call(invocation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::Attributes, Event};

    #[derive(Debug)]
    struct Ping {
        attributes: Attributes,
        payload: Bytes,
    }

    static CRON: Kind = Kind::CRON;

    impl Event for Ping {
        fn kind(&self) -> &Kind {
            &CRON
        }
        fn attributes(&self) -> &Attributes {
            &self.attributes
        }
        fn payload(&self) -> &Bytes {
            &self.payload
        }
    }

    fn invocation() -> Invocation {
        let event = Ping {
            attributes: [("schedule", "@hourly")].into_iter().collect(),
            payload: Bytes::from_static(b"tick"),
        };
        let mut params = Params::new();
        params.push("job", "rotate-logs");
        Invocation::new(Arc::new(event), params, Arc::from("rotate"))
    }

    #[tokio::test]
    async fn closures_are_handlers() {
        let handler = |inv: Invocation| async move {
            let job = inv.param("job").unwrap_or_default().to_owned();
            Ok::<_, HandlerError>(Reply::ok(job))
        };
        let boxed: Box<dyn DynHandler> = Box::new(handler);

        let reply = boxed.call_dyn(invocation()).await.unwrap();
        assert_eq!(reply.payload().as_ref(), b"rotate-logs");
    }

    #[test]
    fn invocation_exposes_event_and_params() {
        let inv = invocation();
        assert_eq!(inv.kind(), &Kind::CRON);
        assert_eq!(inv.attribute("schedule"), Some("@hourly"));
        assert_eq!(inv.attribute("job"), None);
        assert_eq!(inv.payload().as_ref(), b"tick");
        assert_eq!(inv.handler_name(), "rotate");
    }
}
