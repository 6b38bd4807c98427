//! Generic attribute predicates for custom kinds.

use std::sync::Arc;
use switchyard_core::{
    DispatchMode, Event, HandlerEntry, MatchSpecError, MatchStrategy, RouteMatch, Specificity,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    /// `key=value`
    Equals(String, String),
    /// `key=*`
    Present(String),
    /// `!key`
    Absent(String),
}

impl Predicate {
    fn parse(term: &str) -> Result<Self, MatchSpecError> {
        if let Some(key) = term.strip_prefix('!') {
            return Ok(Predicate::Absent(parse_key(key, term)?));
        }
        let Some((key, value)) = term.split_once('=') else {
            return Err(MatchSpecError::new(format!(
                "expected `key=value`, `key=*` or `!key`, found {term:?}"
            )));
        };
        let key = parse_key(key, term)?;
        match value.trim() {
            "*" => Ok(Predicate::Present(key)),
            value => Ok(Predicate::Equals(key, value.to_owned())),
        }
    }

    fn holds(&self, event: &dyn Event) -> bool {
        match self {
            Predicate::Equals(key, value) => event.attribute(key) == Some(value.as_str()),
            Predicate::Present(key) => event.attribute(key).is_some(),
            Predicate::Absent(key) => event.attribute(key).is_none(),
        }
    }
}

fn parse_key(key: &str, term: &str) -> Result<String, MatchSpecError> {
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(MatchSpecError::new(format!("invalid attribute key in {term:?}")));
    }
    Ok(key.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Conjunction {
    predicates: Vec<Predicate>,
    exact: u16,
    present: u16,
}

impl Conjunction {
    fn parse(spec: &str) -> Result<Self, MatchSpecError> {
        let spec = spec.trim();
        let predicates = if spec.is_empty() {
            Vec::new()
        } else {
            spec.split(',')
                .map(|term| match term.trim() {
                    "" => Err(MatchSpecError::new(format!("empty predicate in {spec:?}"))),
                    term => Predicate::parse(term),
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let count = |f: fn(&Predicate) -> bool| predicates.iter().filter(|p| f(p)).count() as u16;
        let exact = count(|p| matches!(p, Predicate::Equals(..)));
        let present = count(|p| matches!(p, Predicate::Present(_)));

        Ok(Self {
            predicates,
            exact,
            present,
        })
    }
}

/// Matching strategy for caller-defined kinds.
///
/// A spec is a comma-separated conjunction of `key=value`, `key=*` (present)
/// and `!key` (absent); the empty spec matches every event. More exact
/// predicates rank higher, then more presence predicates.
///
/// ```ignore
/// builder.register_kind(Kind::new("queue")?, AttributeStrategy::new())?;
/// builder.register_handler(&queue, Route::new("eu-orders", "topic=orders, region=eu", handler))?;
/// ```
#[derive(Clone)]
pub struct AttributeStrategy {
    entries: Vec<(Arc<HandlerEntry>, Conjunction)>,
    default_mode: DispatchMode,
}

impl Default for AttributeStrategy {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            default_mode: DispatchMode::FanOut,
        }
    }
}

impl AttributeStrategy {
    /// Create an empty strategy that fans out by default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different default dispatch mode for this kind.
    pub fn with_default_mode(mut self, mode: DispatchMode) -> Self {
        self.default_mode = mode;
        self
    }
}

impl MatchStrategy for AttributeStrategy {
    fn name(&self) -> &'static str {
        "attributes"
    }

    fn default_mode(&self) -> DispatchMode {
        self.default_mode
    }

    fn insert(&mut self, entry: Arc<HandlerEntry>) -> Result<(), MatchSpecError> {
        let conjunction = Conjunction::parse(entry.match_spec())?;
        self.entries.push((entry, conjunction));
        Ok(())
    }

    fn matches(&self, event: &dyn Event) -> Vec<RouteMatch> {
        self.entries
            .iter()
            .filter(|(_, conjunction)| conjunction.predicates.iter().all(|p| p.holds(event)))
            .map(|(entry, conjunction)| {
                let specificity = Specificity::new([conjunction.exact, conjunction.present]);
                RouteMatch::new(Arc::clone(entry), specificity)
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Vec<Arc<HandlerEntry>> {
        self.entries.iter().map(|(entry, _)| Arc::clone(entry)).collect()
    }

    fn fork(&self) -> Box<dyn MatchStrategy> {
        Box::new(AttributeStrategy::new().with_default_mode(self.default_mode))
    }
}
