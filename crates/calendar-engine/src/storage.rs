//! Storage port -- the persistence contract the engine is built on.
//!
//! Implementations live outside this crate (see [`crate::memory`] for the
//! reference in-memory backend). Every call may suspend on I/O, and these
//! calls are the only suspension points of the engine. A backend reports its
//! own failures as [`CalendarError::Storage`](crate::CalendarError::Storage);
//! "no such id" is reported through the return value, not as an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::event::{CalendarEvent, EventId, Persisted, RecurringEvent};

/// Basic CRUD over one body type.
#[async_trait]
pub trait Store<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Persist `value` under a freshly generated id.
    async fn save(&self, value: T) -> Result<Persisted<T>>;

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Persisted<T>>>;

    /// Replace the body stored under `id`. `None` when there is no such id.
    async fn update(&self, id: &EventId, value: T) -> Result<Option<Persisted<T>>>;

    /// `false` when there is no such id.
    async fn delete(&self, id: &EventId) -> Result<bool>;
}

/// Storage for single events and recurring instances.
#[async_trait]
pub trait EventStore: Store<CalendarEvent> {
    /// Every stored event overlapping the closed range `[start, end]`.
    ///
    /// Backends may return a superset; callers re-apply the exact predicate
    /// from [`crate::conflict`].
    async fn find_overlapping_with_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Persisted<CalendarEvent>>>;

    /// Every instance owned by the recurring event `template_id`.
    async fn find_by_recurring_event_id(
        &self,
        template_id: &EventId,
    ) -> Result<Vec<Persisted<CalendarEvent>>>;
}

/// Storage for recurring-event templates.
pub trait RecurringEventStore: Store<RecurringEvent> {}

impl<S> RecurringEventStore for S where S: Store<RecurringEvent> {}
