//! # Event Model
//!
//! The minimal polymorphic contract every trigger family satisfies. Routers
//! and dispatchers only ever see `dyn Event`, so adding a new family means
//! adding a new event type and a matching strategy, never touching dispatch.
//!
//! An event exposes:
//!
//! - its [`Kind`] tag,
//! - an attribute lookup (missing keys yield `None`, never a fault),
//! - its payload as immutable bytes.

use crate::kind::Kind;
use bytes::Bytes;
use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// An immutable record of one trigger occurrence.
///
/// Events are constructed once by an ingress collaborator, shared as
/// [`SharedEvent`] for the duration of a dispatch and never mutated.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Event",
    label = "must implement `Event`",
    note = "Events expose a kind, an attribute map and a payload, and must be `Send + Sync + 'static`."
)]
pub trait Event: fmt::Debug + Send + Sync + 'static {
    /// The trigger family this event belongs to.
    fn kind(&self) -> &Kind;

    /// Kind-specific routing data, in insertion order.
    fn attributes(&self) -> &Attributes;

    /// The body carried by the trigger.
    fn payload(&self) -> &Bytes;

    /// Look up a single attribute.
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes().get(key)
    }
}

/// A type-erased event shared between the router and every handler
/// invocation of one dispatch.
pub type SharedEvent = Arc<dyn Event>;

/// An insertion-ordered mapping of attribute keys to values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: IndexMap<String, String>,
}

impl Attributes {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Append to an attribute, joining with `", "` when it already exists.
    pub fn append(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let value = value.as_ref();
        self.entries
            .entry(key.into())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_owned());
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
