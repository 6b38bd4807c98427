//! Handler registrations.
//!
//! A [`Route`] is what callers hand to the registry: a named handler with a
//! match spec, a priority and an optional timeout budget. Once accepted, the
//! registry stamps it with its kind and a registration sequence number and
//! stores it as a shared [`HandlerEntry`].

use crate::{
    handler::{DynHandler, Handler},
    kind::Kind,
};
use std::{fmt, sync::Arc, time::Duration};

/// A handler awaiting registration.
///
/// # Example
/// ```ignore
/// let route = Route::new("get-user", "GET /users/{id}", get_user)
///     .with_priority(-10)
///     .with_timeout(Duration::from_millis(250));
/// ```
#[derive(Clone)]
pub struct Route {
    name: Arc<str>,
    match_spec: String,
    priority: i32,
    timeout: Option<Duration>,
    handler: Arc<dyn DynHandler>,
}

impl Route {
    /// Create a route with priority `0` and the dispatcher's default timeout.
    pub fn new<H: Handler>(name: impl Into<Arc<str>>, match_spec: impl Into<String>, handler: H) -> Self {
        Self::from_dyn(name, match_spec, Arc::new(handler))
    }

    /// Create a route from an already type-erased handler.
    pub fn from_dyn(
        name: impl Into<Arc<str>>,
        match_spec: impl Into<String>,
        handler: Arc<dyn DynHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            match_spec: match_spec.into(),
            priority: 0,
            timeout: None,
            handler,
        }
    }

    /// Set priority (lower = dispatched first).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set a per-handler timeout budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The match spec.
    pub fn match_spec(&self) -> &str {
        &self.match_spec
    }

    /// Stamp the route with its kind and registration sequence number.
    pub fn into_entry(self, kind: Kind, sequence: u64) -> HandlerEntry {
        HandlerEntry {
            kind,
            name: self.name,
            match_spec: self.match_spec,
            priority: self.priority,
            timeout: self.timeout,
            sequence,
            handler: self.handler,
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("match_spec", &self.match_spec)
            .field("priority", &self.priority)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A registered handler. Owned by the registry, immutable once created.
pub struct HandlerEntry {
    kind: Kind,
    name: Arc<str>,
    match_spec: String,
    priority: i32,
    timeout: Option<Duration>,
    sequence: u64,
    handler: Arc<dyn DynHandler>,
}

impl HandlerEntry {
    /// The kind this handler is bound to.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name as a shared string, cheap to hand to invocations.
    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// The raw match spec, as registered.
    pub fn match_spec(&self) -> &str {
        &self.match_spec
    }

    /// Priority (lower = dispatched first).
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Per-handler timeout budget, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Registry-wide registration order.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The type-erased handler.
    pub fn handler(&self) -> &Arc<dyn DynHandler> {
        &self.handler
    }

    /// Rebuild the [`Route`] this entry was created from.
    pub fn to_route(&self) -> Route {
        Route {
            name: Arc::clone(&self.name),
            match_spec: self.match_spec.clone(),
            priority: self.priority,
            timeout: self.timeout,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("match_spec", &self.match_spec)
            .field("priority", &self.priority)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
