//! # calendar-engine
//!
//! Event lifecycle engine for calendar applications: single and recurring
//! events, the non-overlap rule, and recurrence expansion.
//!
//! The engine does no I/O of its own. Persistence goes through the async
//! [`storage`] traits, implemented by the embedding application;
//! [`memory::InMemoryStore`] is a ready-made backend.
//!
//! ## Quick start
//!
//! ```rust
//! use calendar_engine::{EventOptions, InMemoryCalendar};
//! use chrono::Utc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let calendar = InMemoryCalendar::in_memory();
//! let event = calendar
//!     .create_event(Utc::now(), 30, "Standup", EventOptions::default())
//!     .await
//!     .unwrap();
//! assert_eq!((event.end_date - event.start_date).num_minutes(), 30);
//! # });
//! ```
//!
//! ## Modules
//!
//! - [`calendar`] — the engine: create/update/delete of events and series
//! - [`recurrence`] — date stepping and rule expansion
//! - [`conflict`] — closed-interval overlap predicate
//! - [`event`] — event, template and rule types
//! - [`storage`] — storage port traits
//! - [`memory`] — in-memory storage backend
//! - [`config`] — engine configuration
//! - [`clock`] — source of "now"
//! - [`error`] — Error types

pub mod calendar;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod error;
pub mod event;
pub mod memory;
pub mod recurrence;
pub mod storage;

pub use calendar::{Calendar, InMemoryCalendar};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CalendarConfig;
pub use conflict::{find_conflicts, intervals_overlap};
pub use error::{CalendarError, Result};
pub use event::{
    CalendarEvent, DeleteRecurringOptions, EventId, EventOptions, Persisted, RecurrenceInterval,
    RecurrenceLimit, RecurrenceRule, RecurringEvent, MAX_EVENT_DURATION_MINUTES,
};
pub use memory::InMemoryStore;
pub use recurrence::{compute_all_recurrences, compute_end_date, compute_next_date, compute_next_recurrence};
pub use storage::{EventStore, RecurringEventStore, Store};
