//! Handler replies and dispatch outcomes.

use crate::error::InvocationError;
use bytes::Bytes;
use std::borrow::Cow;

/// The success value produced by a handler: a status and a payload.
///
/// Status codes follow HTTP conventions so the HTTP ingress can pass them
/// through; other collaborators are free to interpret them loosely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    status: u16,
    payload: Bytes,
    content_type: Option<Cow<'static, str>>,
}

impl Reply {
    /// Create a reply with an explicit status.
    pub fn new(status: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            status,
            payload: payload.into(),
            content_type: None,
        }
    }

    /// A `200` reply.
    pub fn ok(payload: impl Into<Bytes>) -> Self {
        Self::new(200, payload)
    }

    /// A `204` reply with an empty payload.
    pub fn no_content() -> Self {
        Self::new(204, Bytes::new())
    }

    /// Attach a content type.
    pub fn with_content_type(mut self, content_type: impl Into<Cow<'static, str>>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The payload.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The content type, if the handler set one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Whether the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<&'static str> for Reply {
    fn from(text: &'static str) -> Self {
        Reply::ok(text).with_content_type("text/plain; charset=utf-8")
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::ok(text).with_content_type("text/plain; charset=utf-8")
    }
}

impl From<Bytes> for Reply {
    fn from(payload: Bytes) -> Self {
        Reply::ok(payload)
    }
}

impl From<Vec<u8>> for Reply {
    fn from(payload: Vec<u8>) -> Self {
        Reply::ok(payload)
    }
}

impl<T: Into<Reply>> From<(u16, T)> for Reply {
    fn from((status, inner): (u16, T)) -> Self {
        let mut reply = inner.into();
        reply.status = status;
        reply
    }
}

/// The result of one handler invocation, labelled with the handler's name.
#[derive(Debug)]
pub struct HandlerOutcome {
    /// Name of the invoked handler.
    pub handler: String,
    /// What it produced.
    pub result: Result<Reply, InvocationError>,
}

impl HandlerOutcome {
    /// Whether the invocation succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&InvocationError> {
        self.result.as_ref().err()
    }
}

/// A successful dispatch.
#[derive(Debug)]
pub enum Outcome {
    /// First-match dispatch: one handler produced the reply.
    Handled {
        /// Name of the handler that produced the reply.
        handler: String,
        /// The reply.
        reply: Reply,
        /// Recoverable failures of earlier candidates, in router order.
        failed_attempts: Vec<HandlerOutcome>,
    },

    /// Fan-out dispatch: at least one branch succeeded.
    FanOut {
        /// Every branch outcome, in router order.
        outcomes: Vec<HandlerOutcome>,
    },
}

impl Outcome {
    /// The first successful reply, in router order.
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            Outcome::Handled { reply, .. } => Some(reply),
            Outcome::FanOut { outcomes } => {
                outcomes.iter().find_map(|o| o.result.as_ref().ok())
            }
        }
    }

    /// Number of handler invocations that succeeded.
    pub fn succeeded(&self) -> usize {
        match self {
            Outcome::Handled { .. } => 1,
            Outcome::FanOut { outcomes } => outcomes.iter().filter(|o| o.is_success()).count(),
        }
    }

    /// Number of handler invocations that failed.
    pub fn failed(&self) -> usize {
        match self {
            Outcome::Handled {
                failed_attempts, ..
            } => failed_attempts.len(),
            Outcome::FanOut { outcomes } => outcomes.iter().filter(|o| !o.is_success()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;

    #[test]
    fn status_tuple_overrides_status() {
        let reply = Reply::from((201, "created"));
        assert_eq!(reply.status(), 201);
        assert_eq!(reply.payload().as_ref(), b"created");
        assert_eq!(reply.content_type(), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn fan_out_counts() {
        let outcome = Outcome::FanOut {
            outcomes: vec![
                HandlerOutcome {
                    handler: "a".into(),
                    result: Ok(Reply::no_content()),
                },
                HandlerOutcome {
                    handler: "b".into(),
                    result: Err(HandlerError::recoverable("nope").into()),
                },
            ],
        };
        assert_eq!(outcome.succeeded(), 1);
        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.reply().map(Reply::status), Some(204));
    }
}
