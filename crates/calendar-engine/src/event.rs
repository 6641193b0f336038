//! Event model: single events, recurring-event templates and recurrence rules.
//!
//! These are plain data shapes. Ids are assigned by the storage port when a
//! body is saved, so every body type travels wrapped in [`Persisted`] once it
//! has been stored.

use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default upper bound on event duration, in minutes.
pub const MAX_EVENT_DURATION_MINUTES: u32 = 24 * 60;

/// Opaque identifier assigned by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A stored value together with the id its backend assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub id: EventId,
    #[serde(flatten)]
    pub value: T,
}

impl<T> Persisted<T> {
    pub fn new(id: EventId, value: T) -> Self {
        Self { id, value }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Persisted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// A single scheduled interval. Recurring instances carry the id of the
/// template that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_event_id: Option<EventId>,
}

impl CalendarEvent {
    /// A standalone event not owned by any template.
    pub fn new(title: impl Into<String>, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start_date,
            end_date,
            recurring_event_id: None,
        }
    }

    /// Tag this event as an instance of the given template.
    pub fn with_recurring_event_id(mut self, id: EventId) -> Self {
        self.recurring_event_id = Some(id);
        self
    }
}

/// Template for a series of events. `start_date`/`end_date` describe the
/// first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringEvent {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub rule: RecurrenceRule,
}

impl RecurringEvent {
    /// The first occurrence of the series, tagged with `template_id`.
    pub fn seed(&self, template_id: EventId) -> CalendarEvent {
        CalendarEvent::new(self.title.clone(), self.start_date, self.end_date)
            .with_recurring_event_id(template_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceInterval {
    Daily,
    Weekly,
    Monthly,
}

/// How a series ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecurrenceLimit {
    /// Exactly this many occurrences. Zero means none.
    Count { count: u32 },
    /// Occurrences whose end lies strictly before this instant.
    #[serde(rename = "date", rename_all = "camelCase")]
    Until { end_date: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub interval: RecurrenceInterval,
    pub limit: RecurrenceLimit,
}

impl RecurrenceRule {
    pub fn count(interval: RecurrenceInterval, count: u32) -> Self {
        Self {
            interval,
            limit: RecurrenceLimit::Count { count },
        }
    }

    pub fn until(interval: RecurrenceInterval, end_date: DateTime<Utc>) -> Self {
        Self {
            interval,
            limit: RecurrenceLimit::Until { end_date },
        }
    }
}

/// Options for creating and updating events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOptions {
    /// Skip the overlap check entirely.
    pub allow_overlapping: bool,
}

impl EventOptions {
    pub fn allow_overlapping() -> Self {
        Self {
            allow_overlapping: true,
        }
    }
}

/// Options for [`Calendar::delete_recurring_event`](crate::Calendar::delete_recurring_event).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteRecurringOptions {
    /// Delete only this instance of the series. The template stays.
    pub delete_only_instance_id: Option<EventId>,
    /// Delete the template but keep instances that have already started.
    pub delete_only_future_instances: bool,
}
