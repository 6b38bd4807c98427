//! HTTP request events.

use bytes::Bytes;
use std::sync::Arc;
use switchyard_core::{Attributes, Event, Kind, SharedEvent};

/// An inbound HTTP request, normalized.
///
/// Attributes: `method` (uppercase), `path`, `query` (when present) and one
/// `header.<lowercase-name>` entry per header, repeated headers joined with
/// `", "`.
#[derive(Debug, Clone)]
pub struct HttpEvent {
    kind: Kind,
    attributes: Attributes,
    body: Bytes,
}

impl HttpEvent {
    /// Create an event for `method` on `path`.
    pub fn new(method: impl AsRef<str>, path: impl Into<String>) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("method", method.as_ref().to_ascii_uppercase());
        attributes.insert("path", path);
        Self {
            kind: Kind::HTTP,
            attributes,
            body: Bytes::new(),
        }
    }

    /// Attach the raw query string (without the leading `?`).
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            self.attributes.insert("query", query);
        }
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let key = format!("header.{}", name.as_ref().to_ascii_lowercase());
        self.attributes.append(key, value);
        self
    }

    /// Attach the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// The request method.
    pub fn method(&self) -> &str {
        self.attributes.get("method").unwrap_or_default()
    }

    /// The request path.
    pub fn path(&self) -> &str {
        self.attributes.get("path").unwrap_or_default()
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&format!("header.{}", name.to_ascii_lowercase()))
    }

    /// Share the event for dispatch.
    pub fn into_shared(self) -> SharedEvent {
        Arc::new(self)
    }
}

impl Event for HttpEvent {
    fn kind(&self) -> &Kind {
        &self.kind
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn payload(&self) -> &Bytes {
        &self.body
    }
}
