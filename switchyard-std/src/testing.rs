//! Testing utilities for Switchyard.
//!
//! Test doubles for exercising registries and dispatchers without writing
//! bespoke handlers.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records every invocation and replies with a fixed reply
//! - [`ScriptedHandler`]: follows a [`Script`] (succeed, fail, panic, stall)
//! - [`CallLog`]: a shared log of handler names, for asserting invocation order

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use switchyard_core::{Handler, HandlerError, HandlerResult, Invocation, Reply};

// ============================================================================
// Call Log
// ============================================================================

/// Handler names in the order their invocations started.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// let first = ScriptedHandler::new(Script::recoverable("busy")).logging_to(&log);
/// let second = ScriptedHandler::new(Script::reply("ok")).logging_to(&log);
///
/// // register both, dispatch...
///
/// assert_eq!(log.names(), ["first", "second"]);
/// ```
#[derive(Clone, Default)]
pub struct CallLog {
    names: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged handler names.
    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.names.lock().unwrap().clear();
    }

    fn push(&self, name: &str) {
        self.names.lock().unwrap().push(name.to_owned());
    }
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records all invocations it receives.
///
/// Clones share the recording, so keep one clone for assertions and register
/// the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new();
/// builder.register_handler(&Kind::HTTP, Route::new("rec", "GET /", recorder.clone()))?;
///
/// dispatcher.dispatch(event).await?;
///
/// assert_eq!(recorder.count(), 1);
/// assert_eq!(recorder.invocations()[0].attribute("method"), Some("GET"));
/// ```
#[derive(Clone)]
pub struct RecordingHandler {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    reply: Reply,
}

impl RecordingHandler {
    /// Create a recording handler that replies `204 No Content`.
    pub fn new() -> Self {
        Self::with_reply(Reply::no_content())
    }

    /// Create a recording handler that returns a specific reply.
    pub fn with_reply(reply: Reply) -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            reply,
        }
    }

    /// Get a clone of the recorded invocations.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Get the number of recorded invocations.
    pub fn count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    /// Clear all recorded invocations.
    pub fn clear(&self) {
        self.invocations.lock().unwrap().clear();
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for RecordingHandler {
    async fn call(&self, invocation: Invocation) -> HandlerResult {
        self.invocations.lock().unwrap().push(invocation);
        Ok(self.reply.clone())
    }
}

// ============================================================================
// Scripted Handler
// ============================================================================

/// What a [`ScriptedHandler`] does when invoked.
#[derive(Debug, Clone)]
pub enum Script {
    /// Return the reply.
    Reply(Reply),
    /// Fail recoverably with the message.
    Recoverable(String),
    /// Fail fatally with the message.
    Fatal(String),
    /// Panic with the message.
    Panic(String),
    /// Sleep, then follow the inner script.
    Delay(Duration, Box<Script>),
}

impl Script {
    /// Reply `200` with `payload`.
    pub fn reply(payload: impl Into<String>) -> Self {
        Script::Reply(Reply::from(payload.into()))
    }

    /// Fail recoverably.
    pub fn recoverable(message: impl Into<String>) -> Self {
        Script::Recoverable(message.into())
    }

    /// Fail fatally.
    pub fn fatal(message: impl Into<String>) -> Self {
        Script::Fatal(message.into())
    }

    /// Panic.
    pub fn panic(message: impl Into<String>) -> Self {
        Script::Panic(message.into())
    }

    /// Sleep for `delay` before following this script.
    pub fn after(self, delay: Duration) -> Self {
        Script::Delay(delay, Box::new(self))
    }
}

/// A handler that follows a [`Script`] and counts its invocations.
///
/// The count is taken when the invocation starts, so handlers that time out
/// or panic are still counted.
#[derive(Clone)]
pub struct ScriptedHandler {
    script: Script,
    calls: Arc<AtomicUsize>,
    log: Option<CallLog>,
}

impl ScriptedHandler {
    /// Create a handler following `script`.
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            log: None,
        }
    }

    /// Append the handler name to `log` on every invocation.
    pub fn logging_to(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Number of invocations started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Handler for ScriptedHandler {
    async fn call(&self, invocation: Invocation) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.push(invocation.handler_name());
        }

        let mut script = &self.script;
        loop {
            match script {
                Script::Reply(reply) => return Ok(reply.clone()),
                Script::Recoverable(message) => {
                    return Err(HandlerError::recoverable(message.clone()));
                }
                Script::Fatal(message) => return Err(HandlerError::fatal(message.clone())),
                Script::Panic(message) => panic!("{message}"),
                Script::Delay(delay, next) => {
                    tokio::time::sleep(*delay).await;
                    script = next;
                }
            }
        }
    }
}
