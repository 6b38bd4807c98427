//! Events for caller-defined trigger families.

use bytes::Bytes;
use std::sync::Arc;
use switchyard_core::{Attributes, Event, Kind, SharedEvent};

/// An event of any registered kind, carrying free-form attributes.
#[derive(Debug, Clone)]
pub struct CustomEvent {
    kind: Kind,
    attributes: Attributes,
    payload: Bytes,
}

impl CustomEvent {
    /// Create an event of `kind` with no attributes and an empty payload.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            attributes: Attributes::new(),
            payload: Bytes::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Share the event for dispatch.
    pub fn into_shared(self) -> SharedEvent {
        Arc::new(self)
    }
}

impl Event for CustomEvent {
    fn kind(&self) -> &Kind {
        &self.kind
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn payload(&self) -> &Bytes {
        &self.payload
    }
}
