//! Overlap detection between events.
//!
//! Intervals are treated as closed: `[start, end]`. Two events overlap unless
//! one ends strictly before the other starts, so an event ending at `T` and
//! another starting at `T` DO conflict.

use chrono::{DateTime, Utc};

use crate::event::{CalendarEvent, EventId, Persisted};

/// `[a_start, a_end]` and `[b_start, b_end]` share at least one instant.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    !(a_end < b_start || a_start > b_end)
}

/// `event` overlaps the closed range `[start, end]`.
pub fn overlaps_range(event: &CalendarEvent, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    intervals_overlap(event.start_date, event.end_date, start, end)
}

/// A candidate event colliding with one already stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub candidate: CalendarEvent,
    pub existing: Persisted<CalendarEvent>,
    /// Length of the shared interval. Zero when the two only touch.
    pub overlap_minutes: i64,
}

impl Conflict {
    pub fn existing_id(&self) -> &EventId {
        &self.existing.id
    }
}

/// Find all pairwise conflicts between candidate events and stored events.
pub fn find_conflicts(
    candidates: &[CalendarEvent],
    existing: &[Persisted<CalendarEvent>],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for candidate in candidates {
        for stored in existing {
            if overlaps_range(candidate, stored.start_date, stored.end_date) {
                let overlap_start = candidate.start_date.max(stored.start_date);
                let overlap_end = candidate.end_date.min(stored.end_date);
                let overlap_minutes = (overlap_end - overlap_start).num_minutes();

                conflicts.push(Conflict {
                    candidate: candidate.clone(),
                    existing: stored.clone(),
                    overlap_minutes,
                });
            }
        }
    }

    conflicts
}
