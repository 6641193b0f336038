//! The calendar engine -- create, update and delete single and recurring
//! events on top of the storage port.
//!
//! Every operation is a short sequence of store calls (read for overlaps,
//! then write). The engine takes no locks: callers that share a store
//! between concurrent operations must serialize them. Recurring operations
//! run every overlap check before their first write, so a rejected call
//! leaves storage untouched, but they are not transactional against a crash
//! between writes.

use std::slice;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::CalendarConfig;
use crate::conflict::{find_conflicts, overlaps_range};
use crate::error::{CalendarError, Result};
use crate::event::{
    CalendarEvent, DeleteRecurringOptions, EventId, EventOptions, Persisted, RecurrenceRule,
    RecurringEvent,
};
use crate::memory::InMemoryStore;
use crate::recurrence::{compute_all_recurrences, compute_end_date};
use crate::storage::{EventStore, RecurringEventStore};

/// An engine backed entirely by [`InMemoryStore`]s.
pub type InMemoryCalendar = Calendar<InMemoryStore<CalendarEvent>, InMemoryStore<RecurringEvent>>;

/// Event lifecycle engine over an event store `E` and a template store `R`.
pub struct Calendar<E, R> {
    events: E,
    recurring_events: R,
    config: CalendarConfig,
    clock: Arc<dyn Clock>,
}

impl InMemoryCalendar {
    /// An engine over two fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new(), InMemoryStore::new())
    }
}

impl<E, R> Calendar<E, R>
where
    E: EventStore,
    R: RecurringEventStore,
{
    /// An engine with the default configuration and the system clock.
    pub fn new(events: E, recurring_events: R) -> Self {
        Self {
            events,
            recurring_events,
            config: CalendarConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_config(mut self, config: CalendarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn recurring_events(&self) -> &R {
        &self.recurring_events
    }

    /// Create a standalone event of `duration_minutes` starting at `start`.
    ///
    /// # Errors
    /// - [`CalendarError::InvalidEventDuration`] if the duration is zero or
    ///   exceeds the maximum.
    /// - [`CalendarError::DateOutOfRange`] if the end cannot be represented.
    /// - [`CalendarError::OverlappingEvents`] if another event overlaps and
    ///   overlapping is not allowed.
    pub async fn create_event(
        &self,
        start: DateTime<Utc>,
        duration_minutes: u32,
        title: impl Into<String>,
        options: EventOptions,
    ) -> Result<Persisted<CalendarEvent>> {
        self.check_duration(duration_minutes)?;

        let event = CalendarEvent::new(title, start, compute_end_date(start, duration_minutes)?);
        if !options.allow_overlapping {
            self.ensure_no_overlap(&event, |_| false).await?;
        }

        let saved = self.events.save(event).await?;
        info!(id = %saved.id, start = %saved.start_date, "created event");
        Ok(saved)
    }

    /// Create a recurring event and every instance its rule produces.
    ///
    /// All instances are checked for overlaps before anything is written,
    /// so a rejected call persists neither the template nor any instance.
    /// Instances of the new series are not checked against each other.
    /// Returns the stored template.
    pub async fn create_recurring_event(
        &self,
        start: DateTime<Utc>,
        duration_minutes: u32,
        title: impl Into<String>,
        rule: RecurrenceRule,
        options: EventOptions,
    ) -> Result<Persisted<RecurringEvent>> {
        self.check_duration(duration_minutes)?;

        let template = RecurringEvent {
            title: title.into(),
            start_date: start,
            end_date: compute_end_date(start, duration_minutes)?,
            rule,
        };
        let seed = CalendarEvent::new(template.title.clone(), template.start_date, template.end_date);
        let instances = compute_all_recurrences(&seed, &rule)?;
        debug!(instances = instances.len(), interval = ?rule.interval, "expanded recurrence rule");

        if !options.allow_overlapping {
            for instance in &instances {
                self.ensure_no_overlap(instance, |_| false).await?;
            }
        }

        let template = self.recurring_events.save(template).await?;
        for instance in instances {
            self.events
                .save(instance.with_recurring_event_id(template.id.clone()))
                .await?;
        }

        info!(id = %template.id, "created recurring event");
        Ok(template)
    }

    /// Every event (standalone or instance) overlapping `[start, end]`, in
    /// the order the store returns them.
    pub async fn list_events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Persisted<CalendarEvent>>> {
        let mut events = self.events.find_overlapping_with_interval(start, end).await?;
        events.retain(|event| overlaps_range(event, start, end));
        Ok(events)
    }

    pub async fn get_event(&self, id: &EventId) -> Result<Persisted<CalendarEvent>> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| CalendarError::EventNotFound(id.clone()))
    }

    pub async fn get_recurring_event(&self, id: &EventId) -> Result<Persisted<RecurringEvent>> {
        self.recurring_events
            .find_by_id(id)
            .await?
            .ok_or_else(|| CalendarError::EventNotFound(id.clone()))
    }

    /// Every stored instance of the recurring event `template_id`.
    pub async fn list_instances(&self, template_id: &EventId) -> Result<Vec<Persisted<CalendarEvent>>> {
        self.events.find_by_recurring_event_id(template_id).await
    }

    /// Move, resize or retitle the event `id`.
    ///
    /// The event never conflicts with its own previous interval. An instance
    /// keeps its link to the owning recurring event.
    pub async fn update_event(
        &self,
        id: &EventId,
        start: DateTime<Utc>,
        duration_minutes: u32,
        title: impl Into<String>,
        options: EventOptions,
    ) -> Result<Persisted<CalendarEvent>> {
        self.check_duration(duration_minutes)?;

        let mut event = CalendarEvent::new(title, start, compute_end_date(start, duration_minutes)?);
        if !options.allow_overlapping {
            self.ensure_no_overlap(&event, |other| &other.id == id).await?;
        }

        let current = self.get_event(id).await?;
        event.recurring_event_id = current.value.recurring_event_id;

        let updated = self
            .events
            .update(id, event)
            .await?
            .ok_or_else(|| CalendarError::EventNotFound(id.clone()))?;
        info!(id = %updated.id, "updated event");
        Ok(updated)
    }

    /// Replace the rule of recurring event `id` for future occurrences.
    ///
    /// Instances that started at or before now are kept as they are. The
    /// series is recomputed from the template's original first occurrence
    /// and only instances starting after now are stored in place of the
    /// old future ones. Overlaps are checked against events not owned by
    /// this series, all before the first write.
    pub async fn update_recurring_event(
        &self,
        id: &EventId,
        rule: RecurrenceRule,
        options: EventOptions,
    ) -> Result<Persisted<RecurringEvent>> {
        let template = self.get_recurring_event(id).await?;
        let now = self.clock.now();

        let (past, future): (Vec<_>, Vec<_>) = self
            .events
            .find_by_recurring_event_id(id)
            .await?
            .into_iter()
            .partition(|instance| instance.start_date <= now);

        let proposed: Vec<CalendarEvent> = compute_all_recurrences(&template.seed(id.clone()), &rule)?
            .into_iter()
            .filter(|instance| instance.start_date > now)
            .collect();
        debug!(
            id = %id,
            past = past.len(),
            replaced = future.len(),
            proposed = proposed.len(),
            "partitioned recurring event instances"
        );

        if !options.allow_overlapping {
            for instance in &proposed {
                self.ensure_no_overlap(instance, |other| other.recurring_event_id.as_ref() == Some(id))
                    .await?;
            }
        }

        for old in &future {
            self.events.delete(&old.id).await?;
        }
        for instance in proposed {
            self.events.save(instance).await?;
        }

        let updated = self
            .recurring_events
            .update(id, RecurringEvent { rule, ..template.value })
            .await?
            .ok_or_else(|| CalendarError::EventNotFound(id.clone()))?;
        info!(id = %id, "updated recurring event rule");
        Ok(updated)
    }

    /// Delete a standalone event or a single recurring instance.
    pub async fn delete_event(&self, id: &EventId) -> Result<()> {
        if !self.events.delete(id).await? {
            return Err(CalendarError::EventNotFound(id.clone()));
        }
        info!(id = %id, "deleted event");
        Ok(())
    }

    /// Delete recurring event `id`, one of its instances, or its future part.
    ///
    /// - With `delete_only_instance_id`, only that instance is removed and
    ///   the template stays.
    /// - Otherwise the template is removed along with all its instances, or
    ///   only those starting after now when `delete_only_future_instances`
    ///   is set. Retained past instances keep their (now dangling) link.
    ///
    /// Returns the number of instances removed.
    pub async fn delete_recurring_event(
        &self,
        id: &EventId,
        options: DeleteRecurringOptions,
    ) -> Result<usize> {
        if let Some(instance_id) = &options.delete_only_instance_id {
            self.get_recurring_event(id).await?;
            let instance = self
                .events
                .find_by_id(instance_id)
                .await?
                .filter(|instance| instance.recurring_event_id.as_ref() == Some(id))
                .ok_or_else(|| CalendarError::EventNotFound(instance_id.clone()))?;
            self.delete_event(&instance.id).await?;
            return Ok(1);
        }

        if !self.recurring_events.delete(id).await? {
            return Err(CalendarError::EventNotFound(id.clone()));
        }

        let mut instances = self.events.find_by_recurring_event_id(id).await?;
        if options.delete_only_future_instances {
            let now = self.clock.now();
            instances.retain(|instance| instance.start_date > now);
        }
        for instance in &instances {
            self.events.delete(&instance.id).await?;
        }

        info!(id = %id, instances = instances.len(), "deleted recurring event");
        Ok(instances.len())
    }

    fn check_duration(&self, duration_minutes: u32) -> Result<()> {
        let max_minutes = self.config.max_event_duration_minutes;
        if duration_minutes == 0 || duration_minutes > max_minutes {
            return Err(CalendarError::InvalidEventDuration {
                duration_minutes,
                max_minutes,
            });
        }
        Ok(())
    }

    /// Fail with `OverlappingEvents` if `candidate` overlaps a stored event
    /// that `exclude` does not filter out.
    async fn ensure_no_overlap(
        &self,
        candidate: &CalendarEvent,
        exclude: impl Fn(&Persisted<CalendarEvent>) -> bool,
    ) -> Result<()> {
        let mut existing = self
            .events
            .find_overlapping_with_interval(candidate.start_date, candidate.end_date)
            .await?;
        existing.retain(|event| !exclude(event));

        let conflicts = find_conflicts(slice::from_ref(candidate), &existing);
        if let Some(first) = conflicts.first() {
            warn!(
                start = %candidate.start_date,
                conflicting = %first.existing_id(),
                count = conflicts.len(),
                "rejected overlapping event"
            );
            return Err(CalendarError::OverlappingEvents {
                count: conflicts.len(),
            });
        }
        Ok(())
    }
}
