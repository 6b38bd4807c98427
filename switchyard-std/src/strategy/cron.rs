//! Schedule matching for the `cron` kind.
//!
//! A spec is a schedule expression or `*`, optionally followed by
//! `job=<name>`:
//!
//! ```text
//! 0 4 * * *              every firing of that schedule
//! @daily job=rotate-logs only firings of the `rotate-logs` job
//! *                      every firing
//! ```

use crate::events::normalize_schedule;
use std::sync::Arc;
use switchyard_core::{
    DispatchMode, Event, HandlerEntry, MatchSpecError, MatchStrategy, RouteMatch, Specificity,
};

const MACROS: &[&str] = &[
    "@hourly",
    "@daily",
    "@weekly",
    "@monthly",
    "@yearly",
    "@annually",
    "@midnight",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Schedule {
    Any,
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CronSpec {
    schedule: Schedule,
    job: Option<String>,
}

impl CronSpec {
    fn parse(spec: &str) -> Result<Self, MatchSpecError> {
        let mut tokens: Vec<&str> = spec.split_whitespace().collect();

        let job = match tokens.last().and_then(|t| t.strip_prefix("job=")) {
            Some("") => return Err(MatchSpecError::new("`job=` needs a job name")),
            Some(name) => {
                let name = name.to_owned();
                tokens.pop();
                Some(name)
            }
            None => None,
        };

        let schedule = match tokens.as_slice() {
            [] => return Err(MatchSpecError::new("missing schedule expression")),
            ["*"] => Schedule::Any,
            [single] if single.starts_with('@') => {
                let lowered = single.to_ascii_lowercase();
                if !MACROS.contains(&lowered.as_str()) {
                    return Err(MatchSpecError::new(format!(
                        "unknown schedule macro {single:?}"
                    )));
                }
                Schedule::Exact(canonical(&lowered))
            }
            fields if fields.len() == 5 || fields.len() == 6 => {
                if let Some(bad) = fields.iter().find(|f| !is_field(f)) {
                    return Err(MatchSpecError::new(format!("invalid schedule field {bad:?}")));
                }
                Schedule::Exact(fields.join(" "))
            }
            fields => {
                return Err(MatchSpecError::new(format!(
                    "expected 5 or 6 schedule fields, found {}",
                    fields.len()
                )));
            }
        };

        Ok(Self { schedule, job })
    }

    fn specificity(&self, schedule: &str, job: Option<&str>) -> Option<Specificity> {
        let schedule_rank: u16 = match &self.schedule {
            Schedule::Any => 0,
            Schedule::Exact(expected) if *expected == schedule => 1,
            Schedule::Exact(_) => return None,
        };
        let job_rank: u16 = match &self.job {
            None => 0,
            Some(expected) if Some(expected.as_str()) == job => 1,
            Some(_) => return None,
        };
        Some(Specificity::new([schedule_rank, job_rank]))
    }
}

fn is_field(field: &str) -> bool {
    field.bytes().all(|b| {
        b.is_ascii_digit()
            || b.is_ascii_alphabetic()
            || matches!(b, b'*' | b'/' | b',' | b'-' | b'?' | b'#')
    })
}

/// Map macro aliases onto one spelling.
fn canonical(schedule: &str) -> String {
    match schedule {
        "@annually" => "@yearly".to_owned(),
        "@midnight" => "@daily".to_owned(),
        other => other.to_owned(),
    }
}

fn event_schedule(raw: &str) -> String {
    let normalized = normalize_schedule(raw);
    if normalized.starts_with('@') {
        canonical(&normalized.to_ascii_lowercase())
    } else {
        normalized
    }
}

/// Matching strategy for the `cron` kind.
///
/// An exact schedule outranks `*`, and a job-bound entry outranks an unbound
/// one. Dispatches in fan-out mode by default: every subscriber of a firing
/// runs.
#[derive(Default, Clone)]
pub struct CronStrategy {
    entries: Vec<(Arc<HandlerEntry>, CronSpec)>,
}

impl CronStrategy {
    /// Create an empty strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStrategy for CronStrategy {
    fn name(&self) -> &'static str {
        "cron"
    }

    fn default_mode(&self) -> DispatchMode {
        DispatchMode::FanOut
    }

    fn insert(&mut self, entry: Arc<HandlerEntry>) -> Result<(), MatchSpecError> {
        let spec = CronSpec::parse(entry.match_spec())?;
        self.entries.push((entry, spec));
        Ok(())
    }

    fn matches(&self, event: &dyn Event) -> Vec<RouteMatch> {
        let Some(schedule) = event.attribute("schedule") else {
            return Vec::new();
        };
        let schedule = event_schedule(schedule);
        let job = event.attribute("job");

        self.entries
            .iter()
            .filter_map(|(entry, spec)| {
                let specificity = spec.specificity(&schedule, job)?;
                Some(RouteMatch::new(Arc::clone(entry), specificity))
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
        Box::new(CronStrategy::new())
    }
}
