//! Scheduled trigger events.

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use switchyard_core::{Attributes, Event, Kind, SharedEvent};

/// One firing of a schedule.
///
/// Attributes: `schedule` (whitespace-normalized expression), `job` (when
/// the firing belongs to a named job) and `fired_at` (RFC 3339, UTC).
#[derive(Debug, Clone)]
pub struct CronEvent {
    kind: Kind,
    attributes: Attributes,
    payload: Bytes,
}

impl CronEvent {
    /// A firing of `schedule`, stamped with the current time.
    pub fn new(schedule: impl AsRef<str>) -> Self {
        Self::fired_at(schedule, Utc::now())
    }

    /// A firing of `schedule` at an explicit instant.
    pub fn fired_at(schedule: impl AsRef<str>, at: DateTime<Utc>) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("schedule", normalize_schedule(schedule.as_ref()));
        attributes.insert("fired_at", at.to_rfc3339_opts(SecondsFormat::Secs, true));
        Self {
            kind: Kind::CRON,
            attributes,
            payload: Bytes::new(),
        }
    }

    /// Name the job this firing belongs to.
    pub fn with_job(mut self, job: impl Into<String>) -> Self {
        self.attributes.insert("job", job);
        self
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// The normalized schedule expression.
    pub fn schedule(&self) -> &str {
        self.attributes.get("schedule").unwrap_or_default()
    }

    /// Share the event for dispatch.
    pub fn into_shared(self) -> SharedEvent {
        Arc::new(self)
    }
}

impl Event for CronEvent {
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

/// Collapse runs of whitespace so equivalent expressions compare equal.
pub(crate) fn normalize_schedule(expression: &str) -> String {
    expression.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn schedule_is_normalized() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 4, 0, 0).unwrap();
        let event = CronEvent::fired_at("  0  4 * *   *", at).with_job("backup");

        assert_eq!(event.schedule(), "0 4 * * *");
        assert_eq!(event.attribute("job"), Some("backup"));
        assert_eq!(event.attribute("fired_at"), Some("2026-03-01T04:00:00Z"));
        assert_eq!(event.kind(), &Kind::CRON);
    }
}
