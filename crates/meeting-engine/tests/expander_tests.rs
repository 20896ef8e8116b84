//! Tests for occurrence expansion over a projection window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use meeting_engine::{
    expand, EngineError, MeetingInstance, ProjectionWindow, RecurrenceRule, Schedule,
};

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// Helper: a Monday 10:00 schedule on `#proj` anchored at the given date.
fn monday_at_ten(recurrence: RecurrenceRule, anchor: (i32, u32, u32)) -> Schedule {
    Schedule::new(
        "Nova",
        "proj",
        Weekday::Mon,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        30,
        recurrence,
        NaiveDate::from_ymd_opt(anchor.0, anchor.1, anchor.2).unwrap(),
    )
    .unwrap()
}

fn starts(instances: &[MeetingInstance]) -> Vec<DateTime<Utc>> {
    instances.iter().map(|i| i.start).collect()
}

#[test]
fn weekly_expansion_over_four_weeks() {
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 1, 5));

    let instances: Vec<_> =
        expand(&schedule, utc(2026, 1, 5, 0, 0), utc(2026, 2, 2, 0, 0)).collect();

    assert_eq!(
        starts(&instances),
        vec![
            utc(2026, 1, 5, 10, 0),
            utc(2026, 1, 12, 10, 0),
            utc(2026, 1, 19, 10, 0),
            utc(2026, 1, 26, 10, 0),
        ]
    );
}

#[test]
fn instances_carry_owner_channel_and_duration() {
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 1, 5));

    let first = expand(&schedule, utc(2026, 1, 1, 0, 0), utc(2026, 1, 31, 0, 0))
        .next()
        .expect("at least one occurrence");

    assert_eq!(
        first,
        MeetingInstance {
            owner_name: "Nova".to_string(),
            channel: "proj".to_string(),
            start: utc(2026, 1, 5, 10, 0),
            end: utc(2026, 1, 5, 10, 30),
        }
    );
}

#[test]
fn both_window_bounds_are_inclusive() {
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 1, 5));

    let instances: Vec<_> =
        expand(&schedule, utc(2026, 1, 5, 10, 0), utc(2026, 1, 19, 10, 0)).collect();

    assert_eq!(
        starts(&instances),
        vec![
            utc(2026, 1, 5, 10, 0),
            utc(2026, 1, 12, 10, 0),
            utc(2026, 1, 19, 10, 0),
        ]
    );
}

#[test]
fn biweekly_expansion_skips_alternate_weeks() {
    let schedule = monday_at_ten(RecurrenceRule::Biweekly, (2026, 1, 5));

    let instances: Vec<_> =
        expand(&schedule, utc(2026, 1, 1, 0, 0), utc(2026, 3, 1, 0, 0)).collect();

    assert_eq!(
        starts(&instances),
        vec![
            utc(2026, 1, 5, 10, 0),
            utc(2026, 1, 19, 10, 0),
            utc(2026, 2, 2, 10, 0),
            utc(2026, 2, 16, 10, 0),
        ]
    );
}

#[test]
fn biweekly_phase_follows_anchor_not_window() {
    // Anchored a year earlier on opposite weeks: the window must not reset the phase.
    let even = monday_at_ten(RecurrenceRule::Biweekly, (2025, 1, 6));
    let odd = monday_at_ten(RecurrenceRule::Biweekly, (2025, 1, 13));
    let (from, to) = (utc(2026, 1, 1, 0, 0), utc(2026, 3, 1, 0, 0));

    let even: Vec<_> = expand(&even, from, to).collect();
    let odd: Vec<_> = expand(&odd, from, to).collect();

    assert_eq!(
        starts(&even),
        vec![
            utc(2026, 1, 5, 10, 0),
            utc(2026, 1, 19, 10, 0),
            utc(2026, 2, 2, 10, 0),
            utc(2026, 2, 16, 10, 0),
        ]
    );
    assert_eq!(
        starts(&odd),
        vec![
            utc(2026, 1, 12, 10, 0),
            utc(2026, 1, 26, 10, 0),
            utc(2026, 2, 9, 10, 0),
            utc(2026, 2, 23, 10, 0),
        ]
    );
}

#[test]
fn occurrences_before_anchor_are_never_produced() {
    // Window opens long before the anchor; expansion starts at the first occurrence.
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 3, 2));

    let instances: Vec<_> =
        expand(&schedule, utc(2026, 1, 1, 0, 0), utc(2026, 3, 10, 0, 0)).collect();

    assert_eq!(starts(&instances), vec![utc(2026, 3, 2, 10, 0), utc(2026, 3, 9, 10, 0)]);
}

#[test]
fn window_entirely_before_first_occurrence_is_empty() {
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 6, 1));

    assert_eq!(
        expand(&schedule, utc(2026, 1, 1, 0, 0), utc(2026, 2, 1, 0, 0)).count(),
        0
    );
}

#[test]
fn inverted_window_is_empty() {
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 1, 5));

    assert_eq!(
        expand(&schedule, utc(2026, 3, 1, 0, 0), utc(2026, 1, 1, 0, 0)).count(),
        0
    );
}

#[test]
fn sub_second_window_start_excludes_earlier_occurrence() {
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 1, 5));
    let start = utc(2026, 1, 12, 10, 0) + Duration::milliseconds(500);

    let first = expand(&schedule, start, utc(2026, 2, 1, 0, 0))
        .next()
        .expect("at least one occurrence");

    assert_eq!(first.start, utc(2026, 1, 19, 10, 0));
}

#[test]
fn each_call_expands_from_scratch() {
    let schedule = monday_at_ten(RecurrenceRule::Biweekly, (2026, 1, 5));
    let (from, to) = (utc(2026, 1, 1, 0, 0), utc(2026, 12, 31, 0, 0));

    let mut partial = expand(&schedule, from, to);
    partial.next();
    partial.next();

    let first: Vec<_> = expand(&schedule, from, to).collect();
    let second: Vec<_> = expand(&schedule, from, to).collect();
    assert_eq!(first, second);
    assert_eq!(first[0].start, utc(2026, 1, 5, 10, 0));
}

#[test]
fn expansion_is_chronological() {
    let schedule = monday_at_ten(RecurrenceRule::Weekly, (2026, 1, 5));

    let instances: Vec<_> =
        expand(&schedule, utc(2026, 1, 1, 0, 0), utc(2027, 1, 1, 0, 0)).collect();

    assert_eq!(instances.len(), 52);
    for pair in instances.windows(2) {
        assert_eq!(pair[1].start - pair[0].start, Duration::weeks(1));
    }
}

#[test]
fn projection_window_from_now_spans_requested_days() {
    let now = utc(2026, 10, 19, 12, 0);
    let window = ProjectionWindow::from_now(now, 365).unwrap();

    assert_eq!(window.start, now);
    assert_eq!(window.end, utc(2027, 10, 19, 12, 0));
}

#[test]
fn projection_window_past_date_range_is_an_error() {
    let now = utc(2026, 1, 1, 0, 0);
    let err = ProjectionWindow::from_now(now, u32::MAX).unwrap_err();

    assert!(matches!(
        err,
        EngineError::WindowOutOfRange { start, days } if start == now && days == u32::MAX
    ));
    assert!(err.to_string().contains("4294967295 days"));
}

/// A weekly schedule whose first occurrence is on the last representable day.
fn on_last_day(hour: u32, minute: u32) -> Schedule {
    Schedule::new(
        "Nova",
        "proj",
        NaiveDate::MAX.weekday(),
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        60,
        RecurrenceRule::Weekly,
        NaiveDate::MAX,
    )
    .unwrap()
}

#[test]
fn expansion_stops_before_stepping_past_date_range() {
    let schedule = on_last_day(10, 0);
    let first = schedule.next_occurrence();

    let instances: Vec<_> = expand(&schedule, first, DateTime::<Utc>::MAX_UTC).collect();

    assert_eq!(starts(&instances), vec![first]);
    assert_eq!(instances[0].end - instances[0].start, Duration::minutes(60));
}

#[test]
fn occurrence_ending_past_date_range_is_not_produced() {
    // 23:30 + 60 minutes on the last day has no representable end.
    let schedule = on_last_day(23, 30);

    let mut occurrences = expand(&schedule, DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC);

    assert_eq!(occurrences.next(), None);
    assert_eq!(occurrences.next(), None);
}

#[test]
fn window_start_past_last_occurrence_near_range_end_yields_nothing() {
    let schedule = on_last_day(10, 0);
    let after = schedule.next_occurrence() + Duration::hours(1);

    assert_eq!(expand(&schedule, after, DateTime::<Utc>::MAX_UTC).count(), 0);
}

#[test]
fn overlap_is_half_open() {
    let a = MeetingInstance {
        owner_name: "a".to_string(),
        channel: "proj".to_string(),
        start: utc(2026, 1, 5, 10, 0),
        end: utc(2026, 1, 5, 10, 30),
    };
    let touching = MeetingInstance {
        owner_name: "b".to_string(),
        start: utc(2026, 1, 5, 10, 30),
        end: utc(2026, 1, 5, 11, 0),
        ..a.clone()
    };
    let inside = MeetingInstance {
        owner_name: "c".to_string(),
        start: utc(2026, 1, 5, 10, 10),
        end: utc(2026, 1, 5, 10, 20),
        ..a.clone()
    };

    assert!(!a.overlaps(&touching));
    assert!(!touching.overlaps(&a));
    assert!(a.overlaps(&inside));
    assert!(inside.overlaps(&a));
    assert_eq!(a.overlap_minutes(&inside), 10);
    assert_eq!(a.overlap_minutes(&touching), 0);
}
