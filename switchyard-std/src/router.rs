//! Event routing.

use crate::registry::Registry;
use switchyard_core::{DispatchError, Event, RouteMatch};

/// Resolves an event to its ordered candidate handlers.
///
/// Candidates are ordered by ascending priority, then descending
/// specificity, then registration order, so the same snapshot and event
/// always yield the same sequence.
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    registry: &'a Registry,
}

impl<'a> Router<'a> {
    /// Route against a registry snapshot.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Every handler the event satisfies, in dispatch order.
    ///
    /// An empty result is not an error here; the dispatcher reports it.
    pub fn route(&self, event: &dyn Event) -> Result<Vec<RouteMatch>, DispatchError> {
        let kind = event.kind();
        let strategy = self
            .registry
            .strategy_for(kind)
            .map_err(|_| DispatchError::UnknownKind(kind.clone()))?;

        let mut matches = strategy.matches(event);
        matches.sort_by(|a, b| {
            a.entry
                .priority()
                .cmp(&b.entry.priority())
                .then_with(|| b.specificity.cmp(&a.specificity))
                .then_with(|| a.entry.sequence().cmp(&b.entry.sequence()))
        });
        Ok(matches)
    }
}
