//! Tests for recurrence math: date stepping and rule expansion.

use calendar_engine::recurrence::{is_event_ending_before, is_event_starting_after};
use calendar_engine::{
    compute_all_recurrences, compute_end_date, compute_next_date, compute_next_recurrence,
    CalendarError, CalendarEvent, EventId, RecurrenceInterval, RecurrenceRule,
};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
}

/// A 30-minute event starting at `start`.
fn half_hour(start: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent::new("New event", start, start + Duration::minutes(30))
}

// ---------------------------------------------------------------------------
// compute_end_date
// ---------------------------------------------------------------------------

#[test]
fn end_date_adds_minutes() {
    let start = at(2026, 3, 1, 9, 0);
    for minutes in [0u32, 1, 30, 100, 10_000] {
        let end = compute_end_date(start, minutes).unwrap();
        assert_eq!((end - start).num_minutes(), i64::from(minutes));
    }
}

// ---------------------------------------------------------------------------
// compute_next_date
// ---------------------------------------------------------------------------

#[test]
fn daily_adds_24_hours() {
    let date = at(2026, 3, 7, 23, 30);
    assert_eq!(compute_next_date(date, RecurrenceInterval::Daily).unwrap() - date, Duration::hours(24));
}

#[test]
fn weekly_adds_7_days() {
    let date = at(2026, 3, 7, 23, 30);
    assert_eq!(compute_next_date(date, RecurrenceInterval::Weekly).unwrap() - date, Duration::days(7));
}

#[test]
fn monthly_within_same_year() {
    let result = compute_next_date(at(2023, 1, 15, 10, 0), RecurrenceInterval::Monthly).unwrap();
    assert_eq!(result.year(), 2023);
    assert_eq!(result.month(), 2);
    assert_eq!(result.day(), 15);
}

#[test]
fn monthly_december_rolls_into_next_year() {
    let result = compute_next_date(at(2023, 12, 20, 10, 0), RecurrenceInterval::Monthly).unwrap();
    assert_eq!(result, at(2024, 1, 20, 10, 0));
}

#[test]
fn monthly_does_not_clamp_short_months() {
    // Jan 31 → "Feb 31" → Mar 3 in a non-leap year.
    let result = compute_next_date(at(2023, 1, 31, 12, 0), RecurrenceInterval::Monthly).unwrap();
    assert_eq!(result, at(2023, 3, 3, 12, 0));

    // 31-day month into a 30-day month spills one day.
    let result = compute_next_date(at(2026, 5, 31, 12, 0), RecurrenceInterval::Monthly).unwrap();
    assert_eq!(result, at(2026, 7, 1, 12, 0));
}

// ---------------------------------------------------------------------------
// compute_next_recurrence
// ---------------------------------------------------------------------------

#[test]
fn next_recurrence_shifts_both_ends_and_keeps_owner() {
    let event = half_hour(at(2026, 3, 1, 9, 0)).with_recurring_event_id(EventId::from("tpl"));
    let rule = RecurrenceRule::count(RecurrenceInterval::Daily, 10);

    let next = compute_next_recurrence(&event, &rule).unwrap();

    assert_eq!(next.title, event.title);
    assert_eq!(next.start_date, compute_next_date(event.start_date, rule.interval).unwrap());
    assert_eq!(next.end_date, compute_next_date(event.end_date, rule.interval).unwrap());
    assert_eq!(next.recurring_event_id, Some(EventId::from("tpl")));
}

// ---------------------------------------------------------------------------
// compute_all_recurrences: count limit
// ---------------------------------------------------------------------------

#[test]
fn count_zero_yields_nothing() {
    let rule = RecurrenceRule::count(RecurrenceInterval::Daily, 0);
    assert!(compute_all_recurrences(&half_hour(at(2026, 3, 1, 9, 0)), &rule).unwrap().is_empty());
}

#[test]
fn count_five_yields_five_starting_with_seed() {
    let seed = half_hour(at(2026, 3, 1, 9, 0));
    let rule = RecurrenceRule::count(RecurrenceInterval::Daily, 5);

    let result = compute_all_recurrences(&seed, &rule).unwrap();

    assert_eq!(result.len(), 5);
    assert_eq!(result[0], seed);
    for (i, instance) in result.iter().enumerate() {
        assert_eq!(instance.start_date, seed.start_date + Duration::days(i as i64));
        assert_eq!(instance.end_date - instance.start_date, Duration::minutes(30));
    }
}

#[test]
fn count_monthly_steps_calendar_months() {
    let seed = half_hour(at(2026, 11, 15, 9, 0));
    let rule = RecurrenceRule::count(RecurrenceInterval::Monthly, 3);

    let starts: Vec<_> = compute_all_recurrences(&seed, &rule).unwrap()
        .into_iter()
        .map(|e| e.start_date)
        .collect();

    assert_eq!(
        starts,
        vec![at(2026, 11, 15, 9, 0), at(2026, 12, 15, 9, 0), at(2027, 1, 15, 9, 0)]
    );
}

// ---------------------------------------------------------------------------
// compute_all_recurrences: end-date limit
// ---------------------------------------------------------------------------

#[test]
fn until_in_the_past_yields_nothing() {
    let rule = RecurrenceRule::until(RecurrenceInterval::Daily, Utc.timestamp_opt(0, 0).unwrap());
    assert!(compute_all_recurrences(&half_hour(at(2026, 3, 1, 9, 0)), &rule).unwrap().is_empty());
}

#[test]
fn until_ten_days_minus_ten_minutes_yields_ten() {
    let start = at(2026, 3, 1, 9, 0);
    let rule = RecurrenceRule::until(
        RecurrenceInterval::Daily,
        start + Duration::days(10) - Duration::minutes(10),
    );

    let result = compute_all_recurrences(&half_hour(start), &rule).unwrap();

    assert_eq!(result.len(), 10);
    assert_eq!(result[9].start_date, start + Duration::days(9));
}

#[test]
fn until_excludes_instance_ending_exactly_at_bound() {
    let start = at(2026, 3, 1, 9, 0);
    // Third instance ends at Mar 3 09:30, exactly the bound.
    let rule = RecurrenceRule::until(RecurrenceInterval::Daily, at(2026, 3, 3, 9, 30));

    let result = compute_all_recurrences(&half_hour(start), &rule).unwrap();

    assert_eq!(result.len(), 2);
}

#[test]
fn until_keeps_seed_even_when_it_ends_after_bound() {
    let start = at(2026, 3, 1, 9, 0);
    // Bound falls inside the seed: it started before, so it is kept.
    let rule = RecurrenceRule::until(RecurrenceInterval::Weekly, at(2026, 3, 1, 9, 10));

    let result = compute_all_recurrences(&half_hour(start), &rule).unwrap();

    assert_eq!(result, vec![half_hour(start)]);
}

#[test]
fn until_seed_starting_exactly_at_bound_is_kept() {
    let start = at(2026, 3, 1, 9, 0);
    let rule = RecurrenceRule::until(RecurrenceInterval::Daily, start);

    assert_eq!(compute_all_recurrences(&half_hour(start), &rule).unwrap().len(), 1);
}

#[test]
fn expansion_is_restartable() {
    let seed = half_hour(at(2026, 3, 1, 9, 0));
    let rule = RecurrenceRule::until(RecurrenceInterval::Weekly, at(2026, 6, 1, 0, 0));

    assert_eq!(
        compute_all_recurrences(&seed, &rule).unwrap(),
        compute_all_recurrences(&seed, &rule).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Range overflow
// ---------------------------------------------------------------------------

#[test]
fn end_date_past_last_instant_is_out_of_range() {
    let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(10);
    let err = compute_end_date(start, 30).unwrap_err();
    assert!(matches!(err, CalendarError::DateOutOfRange { from } if from == start), "got {err:?}");
}

#[test]
fn stepping_past_last_instant_is_out_of_range() {
    let date = DateTime::<Utc>::MAX_UTC - Duration::hours(12);
    for interval in [
        RecurrenceInterval::Daily,
        RecurrenceInterval::Weekly,
        RecurrenceInterval::Monthly,
    ] {
        assert!(
            matches!(compute_next_date(date, interval), Err(CalendarError::DateOutOfRange { .. })),
            "{interval:?} should overflow"
        );
    }
}

#[test]
fn monthly_series_running_off_the_calendar_is_out_of_range() {
    let seed = half_hour(at(262_142, 3, 1, 9, 0));
    let rule = RecurrenceRule::count(RecurrenceInterval::Monthly, 24);

    let err = compute_all_recurrences(&seed, &rule).unwrap_err();
    assert!(matches!(err, CalendarError::DateOutOfRange { .. }), "got {err:?}");
}

#[test]
fn daily_series_near_last_instant_is_out_of_range() {
    let seed = half_hour(DateTime::<Utc>::MAX_UTC - Duration::days(3));
    let rule = RecurrenceRule::count(RecurrenceInterval::Daily, 10);

    assert!(matches!(
        compute_all_recurrences(&seed, &rule),
        Err(CalendarError::DateOutOfRange { .. })
    ));
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

#[test]
fn start_and_end_predicates_are_strict() {
    let event = half_hour(at(2026, 3, 1, 9, 0));

    assert!(!is_event_starting_after(&event, event.start_date));
    assert!(is_event_starting_after(&event, event.start_date - Duration::seconds(1)));

    assert!(!is_event_ending_before(&event, event.end_date));
    assert!(is_event_ending_before(&event, event.end_date + Duration::seconds(1)));
}
