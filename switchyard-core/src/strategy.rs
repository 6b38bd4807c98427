//! # Matching Strategies
//!
//! A matching strategy owns the compiled route entries of one event kind and
//! decides which of them an event satisfies. It is the only kind-specific
//! piece of the pipeline: the router merely orders what the strategy returns.
//!
//! # Ordering
//!
//! Strategies report a [`Specificity`] for every match. The router orders
//! matches by ascending priority, then descending specificity, then
//! registration order, so strategies define what "more specific" means for
//! their kind without deciding the final order themselves.

use crate::{
    error::{InvalidDispatchModeError, MatchSpecError},
    event::Event,
    handler::Params,
    route::HandlerEntry,
};
use std::{fmt, str::FromStr, sync::Arc};

/// How multiple matched handlers are invoked and aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchMode {
    /// Invoke in router order; the first success wins.
    #[default]
    FirstMatch,
    /// Invoke every match concurrently; succeed unless all fail.
    FanOut,
}

impl DispatchMode {
    /// The configuration spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::FirstMatch => "first-match",
            DispatchMode::FanOut => "fan-out",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMode {
    type Err = InvalidDispatchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-match" => Ok(DispatchMode::FirstMatch),
            "fan-out" | "fanout" => Ok(DispatchMode::FanOut),
            _ => Err(InvalidDispatchModeError::new(s)),
        }
    }
}

/// How precisely a route entry matched an event. Larger is more specific.
///
/// Compared lexicographically, so strategies can encode ranked criteria
/// (e.g. one rank per path segment followed by a method rank).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(Vec<u16>);

impl Specificity {
    /// Build a specificity from ranked criteria, most significant first.
    pub fn new(ranks: impl Into<Vec<u16>>) -> Self {
        Self(ranks.into())
    }

    /// The ranked criteria.
    pub fn ranks(&self) -> &[u16] {
        &self.0
    }
}

/// A route entry that an event satisfied.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched handler.
    pub entry: Arc<HandlerEntry>,
    /// How precisely it matched.
    pub specificity: Specificity,
    /// Values captured while matching.
    pub params: Params,
}

impl RouteMatch {
    /// A match that captured nothing.
    pub fn new(entry: Arc<HandlerEntry>, specificity: Specificity) -> Self {
        Self {
            entry,
            specificity,
            params: Params::new(),
        }
    }

    /// Attach captured values.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// A kind-specific algorithm that evaluates route entries against events.
///
/// Strategies are built during startup (`&mut self` insertion) and are
/// read-only afterwards (`&self` matching), shared across concurrent
/// dispatches.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a matching strategy",
    label = "missing `MatchStrategy` implementation",
    note = "Implement `MatchStrategy` to introduce a new event kind."
)]
pub trait MatchStrategy: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The dispatch mode used for this kind unless configuration overrides it.
    fn default_mode(&self) -> DispatchMode {
        DispatchMode::FirstMatch
    }

    /// Compile and store a route entry.
    ///
    /// Must leave the strategy unchanged when the match spec is rejected.
    fn insert(&mut self, entry: Arc<HandlerEntry>) -> Result<(), MatchSpecError>;

    /// Every stored entry the event satisfies, in any order.
    fn matches(&self, event: &dyn Event) -> Vec<RouteMatch>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Whether no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored entries in registration order.
    fn entries(&self) -> Vec<Arc<HandlerEntry>>;

    /// An empty strategy with the same configuration, used to rebuild a
    /// registry snapshot.
    fn fork(&self) -> Box<dyn MatchStrategy>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specificity_is_lexicographic() {
        let literal = Specificity::new([2u16, 2, 1]);
        let param = Specificity::new([2u16, 1, 1]);
        let catch_all = Specificity::new([2u16, 0, 1]);
        assert!(literal > param);
        assert!(param > catch_all);
    }

    #[test]
    fn mode_parses_config_spellings() {
        assert_eq!("first-match".parse::<DispatchMode>(), Ok(DispatchMode::FirstMatch));
        assert_eq!("FAN_OUT".parse::<DispatchMode>(), Ok(DispatchMode::FanOut));
        let err = "broadcast".parse::<DispatchMode>().unwrap_err();
        assert_eq!(err.mode(), "broadcast");
        assert!(err.to_string().contains("first-match"));
        assert_eq!(DispatchMode::default(), DispatchMode::FirstMatch);
    }
}
