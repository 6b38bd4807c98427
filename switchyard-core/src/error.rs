//! Error types for Switchyard.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SwitchyardError`] - Top-level error type
//! - [`RegistryError`] - Registration-time misconfiguration
//! - [`DispatchError`] - Per-event routing and dispatch failures
//! - [`HandlerError`] - Failures raised and classified by handlers
//! - [`InvocationError`] - The fate of one handler invocation

use crate::{kind::Kind, outcome::HandlerOutcome};
use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Switchyard operations.
#[derive(Error, Debug)]
pub enum SwitchyardError {
    /// The registry rejected a registration.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An event could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A kind tag failed validation.
    #[error(transparent)]
    InvalidKind(#[from] InvalidKindError),
}

/// A kind tag failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid event kind {tag:?}: {reason}")]
pub struct InvalidKindError {
    tag: String,
    reason: &'static str,
}

impl InvalidKindError {
    pub(crate) fn new(tag: &str, reason: &'static str) -> Self {
        Self {
            tag: tag.to_owned(),
            reason,
        }
    }

    /// The rejected tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// A dispatch mode name that is neither `first-match` nor `fan-out`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown dispatch mode {mode:?} (expected \"first-match\" or \"fan-out\")")]
pub struct InvalidDispatchModeError {
    mode: String,
}

impl InvalidDispatchModeError {
    pub(crate) fn new(mode: impl Into<String>) -> Self {
        Self { mode: mode.into() }
    }

    /// The rejected mode name.
    pub fn mode(&self) -> &str {
        &self.mode
    }
}

/// A match spec that a strategy could not compile.
///
/// Strategies return this from [`MatchStrategy::insert`]; the registry wraps
/// it into [`RegistryError::InvalidMatchSpec`] with the kind and spec attached.
///
/// [`MatchStrategy::insert`]: crate::MatchStrategy::insert
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MatchSpecError(pub String);

impl MatchSpecError {
    /// Create a new error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Registration-time misconfiguration. Fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The kind was registered twice.
    #[error("event kind `{0}` is already registered")]
    DuplicateKind(Kind),

    /// The kind was never registered.
    #[error("event kind `{0}` is not registered")]
    UnknownKind(Kind),

    /// The handler's match spec is malformed for its kind.
    #[error("invalid match spec {spec:?} for `{kind}` handler `{handler}`: {reason}")]
    InvalidMatchSpec {
        /// Kind the handler was registered under.
        kind: Kind,
        /// Name of the rejected handler.
        handler: String,
        /// The offending spec.
        spec: String,
        /// Why the strategy rejected it.
        reason: String,
    },
}

/// A failure raised by a handler, classified by the handler itself.
///
/// The dispatcher trusts this classification: recoverable failures let
/// first-match dispatch try the next candidate, fatal ones abort it.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The next candidate may be tried.
    #[error("recoverable: {0}")]
    Recoverable(#[source] BoxError),

    /// Dispatch must abort.
    #[error("fatal: {0}")]
    Fatal(#[source] BoxError),
}

impl HandlerError {
    /// Create a recoverable failure.
    pub fn recoverable(err: impl Into<BoxError>) -> Self {
        Self::Recoverable(err.into())
    }

    /// Create a fatal failure.
    pub fn fatal(err: impl Into<BoxError>) -> Self {
        Self::Fatal(err.into())
    }

    /// Whether the failure allows trying the next candidate.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable(_))
    }
}

/// The failure of a single handler invocation.
#[derive(Error, Debug)]
pub enum InvocationError {
    /// The handler returned an error.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// The handler exceeded its invocation budget.
    #[error("handler timed out after {0:?}")]
    Timeout(Duration),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// The handler task was cancelled before it produced a result.
    #[error("handler task was cancelled")]
    Cancelled,
}

impl InvocationError {
    /// Whether first-match dispatch may continue with the next candidate.
    ///
    /// Timeouts and handler-declared recoverable failures are recoverable;
    /// everything else is fatal.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Handler(err) => err.is_recoverable(),
            Self::Timeout(_) => true,
            Self::Panicked(_) | Self::Cancelled => false,
        }
    }

    /// Whether this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Errors returned to the ingress collaborator for a single event.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The event's kind is not registered.
    #[error("event kind `{0}` is not registered")]
    UnknownKind(Kind),

    /// No handler matched the event. Not a system fault.
    #[error("no handler matched the `{kind}` event")]
    NoMatch {
        /// Kind of the unmatched event.
        kind: Kind,
    },

    /// A handler failed fatally and first-match dispatch aborted.
    #[error("handler `{handler}` failed: {source}")]
    Fatal {
        /// Name of the failing handler.
        handler: String,
        /// What went wrong.
        #[source]
        source: InvocationError,
    },

    /// Every first-match candidate failed recoverably.
    #[error("all {} candidate handlers for the `{kind}` event failed", .attempts.len())]
    Exhausted {
        /// Kind of the event.
        kind: Kind,
        /// Every attempt, in router order.
        attempts: Vec<HandlerOutcome>,
    },

    /// Every fan-out branch failed.
    #[error("all {} fan-out handlers for the `{kind}` event failed", .outcomes.len())]
    AllFailed {
        /// Kind of the event.
        kind: Kind,
        /// Every branch outcome, in router order.
        outcomes: Vec<HandlerOutcome>,
    },
}

// `?` on a boxed error inside a handler yields a recoverable failure.
impl From<BoxError> for HandlerError {
    fn from(err: BoxError) -> Self {
        HandlerError::Recoverable(err)
    }
}
