//! Error types for calendar-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::EventId;

/// Errors surfaced by the calendar engine and its storage port.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// The requested duration is zero or exceeds the configured maximum.
    /// Raised before any storage access.
    #[error("Event duration of {duration_minutes} minutes is outside 1..={max_minutes} minutes")]
    InvalidEventDuration {
        duration_minutes: u32,
        max_minutes: u32,
    },

    /// A write would collide with `count` existing events.
    #[error("Two or more events would be overlapping ({count} conflicting). Change interval or set `allow_overlapping`")]
    OverlappingEvents { count: usize },

    /// Date arithmetic starting at `from` left the range `chrono` can
    /// represent. Raised before any storage write.
    #[error("Date out of range: stepping from {from} overflows")]
    DateOutOfRange { from: DateTime<Utc> },

    #[error("Event {0} is not in calendar")]
    EventNotFound(EventId),

    /// A storage backend failed for reasons of its own.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Convenience alias used throughout calendar-engine.
pub type Result<T> = std::result::Result<T, CalendarError>;
