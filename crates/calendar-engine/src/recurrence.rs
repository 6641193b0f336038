//! Recurrence math -- date stepping and rule expansion into concrete instances.
//!
//! Everything here is a pure function of its inputs. Expansion is eager and
//! always finite: count-limited rules stop after `count` steps and
//! date-limited rules stop once an instance's end reaches the bound, which
//! every step moves strictly closer to.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};

use crate::error::{CalendarError, Result};
use crate::event::{CalendarEvent, RecurrenceInterval, RecurrenceLimit, RecurrenceRule};

/// `start + duration_minutes`.
///
/// # Errors
/// [`CalendarError::DateOutOfRange`] if the end is past the last instant
/// `chrono` can represent.
pub fn compute_end_date(start: DateTime<Utc>, duration_minutes: u32) -> Result<DateTime<Utc>> {
    start
        .checked_add_signed(Duration::minutes(i64::from(duration_minutes)))
        .ok_or(CalendarError::DateOutOfRange { from: start })
}

/// Step `date` forward by one `interval`.
///
/// Daily and weekly steps are fixed 24h / 7×24h offsets. Monthly steps keep
/// the day-of-month and time of day and move to the next calendar month
/// (December rolls into January of the next year). The day is not clamped:
/// if the target month is too short the surplus days spill into the month
/// after, so January 31 becomes March 3 in a non-leap year.
///
/// # Errors
/// [`CalendarError::DateOutOfRange`] if the step leaves the range `chrono`
/// can represent.
pub fn compute_next_date(date: DateTime<Utc>, interval: RecurrenceInterval) -> Result<DateTime<Utc>> {
    let next = match interval {
        RecurrenceInterval::Daily => date.checked_add_signed(Duration::days(1)),
        RecurrenceInterval::Weekly => date.checked_add_signed(Duration::weeks(1)),
        RecurrenceInterval::Monthly => next_month(date),
    };
    next.ok_or(CalendarError::DateOutOfRange { from: date })
}

fn next_month(date: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    // Day 1 always exists; adding the remaining days reproduces the rollover.
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let day = first.checked_add_days(Days::new(u64::from(date.day() - 1)))?;
    Some(Utc.from_utc_datetime(&day.and_time(date.time())))
}

/// The occurrence after `event`: both ends shifted by one rule interval.
/// Title and owning template are carried over.
pub fn compute_next_recurrence(event: &CalendarEvent, rule: &RecurrenceRule) -> Result<CalendarEvent> {
    Ok(CalendarEvent {
        title: event.title.clone(),
        start_date: compute_next_date(event.start_date, rule.interval)?,
        end_date: compute_next_date(event.end_date, rule.interval)?,
        recurring_event_id: event.recurring_event_id.clone(),
    })
}

/// Expand `rule` starting at `seed` into every instance of the series.
///
/// - `Count { count: 0 }` yields nothing; `Count { count: n }` yields exactly
///   `n` instances with the seed first.
/// - `Until { end_date }` yields nothing when the seed starts after
///   `end_date`. Otherwise it yields the seed followed by every next
///   recurrence whose end is strictly before `end_date`.
///
/// # Errors
/// [`CalendarError::DateOutOfRange`] if an instance falls outside the range
/// `chrono` can represent.
pub fn compute_all_recurrences(seed: &CalendarEvent, rule: &RecurrenceRule) -> Result<Vec<CalendarEvent>> {
    match rule.limit {
        RecurrenceLimit::Count { count } => {
            if count == 0 {
                return Ok(Vec::new());
            }
            let mut recurrences = vec![seed.clone()];
            for _ in 1..count {
                let next = compute_next_recurrence(&recurrences[recurrences.len() - 1], rule)?;
                recurrences.push(next);
            }
            Ok(recurrences)
        }
        RecurrenceLimit::Until { end_date } => {
            if is_event_starting_after(seed, end_date) {
                return Ok(Vec::new());
            }
            let mut recurrences = vec![seed.clone()];
            let mut next = compute_next_recurrence(seed, rule)?;
            while is_event_ending_before(&next, end_date) {
                let following = compute_next_recurrence(&next, rule)?;
                recurrences.push(next);
                next = following;
            }
            Ok(recurrences)
        }
    }
}

/// `event` starts strictly after `date`.
pub fn is_event_starting_after(event: &CalendarEvent, date: DateTime<Utc>) -> bool {
    event.start_date > date
}

/// `event` ends strictly before `date`.
pub fn is_event_ending_before(event: &CalendarEvent, date: DateTime<Utc>) -> bool {
    event.end_date < date
}
