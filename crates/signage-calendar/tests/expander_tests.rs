//! Tests for schedule expansion.

use std::cell::RefCell;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use signage_calendar::diagnostics::Diagnostic;
use signage_calendar::palette::{self, PALETTE};
use signage_calendar::schedule::{ContentType, OccurrencePart};
use signage_calendar::{expand_schedule, expand_schedule_with_sink, expand_schedules, DateRange, Schedule};

const EVERY_DAY: &str = "0,1,2,3,4,5,6";

fn schedule(
    id: u64,
    start_date: &str,
    end_date: &str,
    days: Option<&str>,
    start_time: &str,
    end_time: &str,
) -> Schedule {
    Schedule {
        id,
        name: format!("Schedule {}", id),
        player_id: Some(10),
        player_name: Some("Lobby TV".to_string()),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        days_of_week: days.map(str::to_string),
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        ..Schedule::default()
    }
}

fn range(from: &str, to: &str) -> DateRange {
    DateRange::parse(from, to).expect("valid range")
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

// ---------------------------------------------------------------------------
// The reference week: 2025-01-01 is a Wednesday
// ---------------------------------------------------------------------------

#[test]
fn work_week_over_wednesday_to_tuesday() {
    let s = schedule(
        1,
        "01/01/2025 00:00:00",
        "07/01/2025 23:59:59",
        Some("1,2,3,4,5"),
        "09:00:00",
        "18:00:00",
    );

    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));

    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "1-2025-01-01",
            "1-2025-01-02",
            "1-2025-01-03",
            "1-2025-01-06",
            "1-2025-01-07"
        ]
    );
    for event in &events {
        assert_eq!(event.start.date(), event.end.date(), "must not span midnight");
        assert_eq!(event.start.hour(), 9);
        assert_eq!(event.end.hour(), 18);
        assert!(!event.all_day);
        assert_eq!(event.extended_props.part, OccurrencePart::Single);
    }
    assert_eq!(events[0].start, at(2025, 1, 1, 9, 0, 0));
    assert_eq!(events[4].end, at(2025, 1, 7, 18, 0, 0));
}

#[test]
fn expansion_is_idempotent() {
    let s = schedule(
        5,
        "01/01/2025 00:00:00",
        "31/01/2025 23:59:59",
        Some(EVERY_DAY),
        "22:00:00",
        "02:00:00",
    );
    let r = range("2025-01-01", "2025-01-14");

    assert_eq!(expand_schedule(&s, &r), expand_schedule(&s, &r));
    assert_eq!(
        serde_json::to_string(&expand_schedule(&s, &r)).unwrap(),
        serde_json::to_string(&expand_schedule(&s, &r)).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Range clipping
// ---------------------------------------------------------------------------

#[test]
fn schedule_outside_range_expands_to_nothing() {
    let s = schedule(
        2,
        "01/02/2025 00:00:00",
        "28/02/2025 23:59:59",
        Some(EVERY_DAY),
        "09:00:00",
        "10:00:00",
    );
    assert!(expand_schedule(&s, &range("2025-01-01", "2025-01-31")).is_empty());
    assert!(expand_schedule(&s, &range("2025-03-01", "2025-03-31")).is_empty());
}

#[test]
fn validity_bounds_cut_occurrences_mid_day() {
    let s = schedule(
        3,
        "03/01/2025 15:00:00",
        "05/01/2025 08:00:00",
        Some(EVERY_DAY),
        "09:00:00",
        "10:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));

    // Jan 3 ends before validity starts; Jan 5 starts after it ends.
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["3-2025-01-04"]);
}

#[test]
fn occurrence_straddling_validity_start_is_kept() {
    let s = schedule(
        3,
        "03/01/2025 15:00:00",
        "05/01/2025 23:59:59",
        Some(EVERY_DAY),
        "14:00:00",
        "18:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].start, at(2025, 1, 3, 14, 0, 0));
}

#[test]
fn end_date_at_midnight_excludes_that_day() {
    let s = schedule(
        9,
        "01/01/2025 00:00:00",
        "03/01/2025 00:00:00",
        Some(EVERY_DAY),
        "09:00:00",
        "18:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));

    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["9-2025-01-01", "9-2025-01-02"]);
    assert!(events.iter().all(|e| e.start < at(2025, 1, 3, 0, 0, 0)));
}

#[test]
fn date_only_end_keeps_the_whole_last_day() {
    let s = schedule(
        9,
        "01/01/2025",
        "03/01/2025",
        Some(EVERY_DAY),
        "09:00:00",
        "18:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].id, "9-2025-01-03");
}

#[test]
fn overnight_tail_stops_at_mid_day_end() {
    let s = schedule(
        14,
        "01/01/2025 00:00:00",
        "03/01/2025 01:00:00",
        Some(EVERY_DAY),
        "22:00:00",
        "02:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));

    // The last tail starts at midnight on Jan 3, before the 01:00 end.
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "14-2025-01-01-p1",
            "14-2025-01-01-p2",
            "14-2025-01-02-p1",
            "14-2025-01-02-p2"
        ]
    );
}

#[test]
fn overnight_tail_dropped_when_end_is_midnight() {
    let s = schedule(
        15,
        "01/01/2025 00:00:00",
        "03/01/2025 00:00:00",
        Some(EVERY_DAY),
        "22:00:00",
        "02:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 3);
    assert_eq!(events.last().unwrap().id, "15-2025-01-02-p1");
}

#[test]
fn loose_midnight_times_are_not_all_day() {
    let s = schedule(
        16,
        "01/01/2025 00:00:00",
        "01/01/2025 23:59:59",
        Some(EVERY_DAY),
        "00:00",
        "23:59:59",
    );
    assert!(!s.is_all_day());

    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-01"));
    assert_eq!(events.len(), 1);
    assert!(!events[0].all_day);
    assert_eq!(events[0].id, "16-2025-01-01");
    assert_eq!(events[0].extended_props.part, OccurrencePart::Single);
}

#[test]
fn inverted_range_expands_to_nothing() {
    let s = schedule(
        4,
        "01/01/2025 00:00:00",
        "31/12/2025 23:59:59",
        Some(EVERY_DAY),
        "09:00:00",
        "10:00:00",
    );
    let inverted = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    );
    assert!(expand_schedule(&s, &inverted).is_empty());
}

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

#[test]
fn backend_zero_is_sunday() {
    let s = schedule(
        6,
        "01/01/2025 00:00:00",
        "31/01/2025 23:59:59",
        Some("0"),
        "09:00:00",
        "10:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "6-2025-01-05");
}

#[test]
fn missing_days_default_to_work_week() {
    let s = schedule(
        7,
        "01/01/2025 00:00:00",
        "31/01/2025 23:59:59",
        None,
        "09:00:00",
        "10:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e.id != "7-2025-01-04" && e.id != "7-2025-01-05"));
}

#[test]
fn unparseable_days_drop_silently() {
    let s = schedule(
        8,
        "01/01/2025 00:00:00",
        "31/01/2025 23:59:59",
        Some("3,foo,9"),
        "09:00:00",
        "10:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "8-2025-01-01");
}

// ---------------------------------------------------------------------------
// Window shapes
// ---------------------------------------------------------------------------

#[test]
fn overnight_splits_and_drops_tail_past_range() {
    let s = schedule(
        9,
        "01/01/2025 00:00:00",
        "31/01/2025 23:59:59",
        Some(EVERY_DAY),
        "22:00:00",
        "02:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-02"));

    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["9-2025-01-01-p1", "9-2025-01-01-p2", "9-2025-01-02-p1"]
    );

    assert_eq!(events[0].start, at(2025, 1, 1, 22, 0, 0));
    assert_eq!(events[0].end, at(2025, 1, 1, 23, 59, 59));
    assert_eq!(events[1].start, at(2025, 1, 2, 0, 0, 0));
    assert_eq!(events[1].end, at(2025, 1, 2, 2, 0, 0));
    assert_eq!(events[1].extended_props.part, OccurrencePart::OvernightEnd);
    assert_eq!(events[2].extended_props.part, OccurrencePart::OvernightStart);
}

#[test]
fn overnight_tail_respects_schedule_end() {
    let s = schedule(
        10,
        "01/01/2025 00:00:00",
        "02/01/2025 23:59:59",
        Some(EVERY_DAY),
        "22:00:00",
        "02:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 3);
    assert_eq!(events.last().unwrap().id, "10-2025-01-02-p1");
}

#[test]
fn overnight_tail_lands_on_unlisted_weekday() {
    // Friday only; the after-midnight part falls on Saturday.
    let s = schedule(
        11,
        "01/01/2025 00:00:00",
        "31/01/2025 23:59:59",
        Some("5"),
        "20:00:00",
        "01:30:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].id, "11-2025-01-03-p2");
    assert_eq!(events[1].start, at(2025, 1, 4, 0, 0, 0));
    assert_eq!(events[1].end, at(2025, 1, 4, 1, 30, 0));
}

#[test]
fn all_day_sentinel_never_splits() {
    let s = schedule(
        12,
        "01/01/2025 00:00:00",
        "31/01/2025 23:59:59",
        Some(EVERY_DAY),
        "00:00:00",
        "23:59:59",
    );
    assert!(s.is_all_day());

    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 7);
    for event in &events {
        assert!(event.all_day);
        assert!(event.id.ends_with("-allday"));
        assert_eq!(event.start.time(), at(2025, 1, 1, 0, 0, 0).time());
        assert_eq!(event.end.time(), at(2025, 1, 1, 23, 59, 59).time());
        assert_eq!(event.start.date(), event.end.date());
    }
}

#[test]
fn short_times_accepted() {
    let s = schedule(
        13,
        "01/01/2025",
        "01/01/2025",
        Some(EVERY_DAY),
        "08:15",
        "09:45",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-01"));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start, at(2025, 1, 1, 8, 15, 0));
    assert_eq!(events[0].end, at(2025, 1, 1, 9, 45, 0));
}

// ---------------------------------------------------------------------------
// Malformed input degrades to no events
// ---------------------------------------------------------------------------

#[test]
fn malformed_date_reports_and_expands_to_nothing() {
    let s = schedule(
        14,
        "2025-01-01",
        "07/01/2025 23:59:59",
        Some(EVERY_DAY),
        "09:00:00",
        "10:00:00",
    );
    let seen = RefCell::new(Vec::new());
    let sink = |d: &Diagnostic| seen.borrow_mut().push(d.clone());

    let events = expand_schedule_with_sink(&s, &range("2025-01-01", "2025-01-07"), &sink);

    assert!(events.is_empty());
    assert_eq!(
        seen.borrow().as_slice(),
        &[Diagnostic::MalformedDate {
            schedule_id: 14,
            field: "start_date",
            value: "2025-01-01".to_string(),
        }]
    );
}

#[test]
fn malformed_time_reports_and_expands_to_nothing() {
    let s = schedule(
        15,
        "01/01/2025 00:00:00",
        "07/01/2025 23:59:59",
        Some(EVERY_DAY),
        "09:00:00",
        "late",
    );
    let seen = RefCell::new(Vec::new());
    let sink = |d: &Diagnostic| seen.borrow_mut().push(d.clone());

    let events = expand_schedule_with_sink(&s, &range("2025-01-01", "2025-01-07"), &sink);

    assert!(events.is_empty());
    assert!(matches!(
        seen.borrow().as_slice(),
        [Diagnostic::MalformedTime { schedule_id: 15, field: "end_time", .. }]
    ));
}

#[test]
fn one_bad_record_does_not_blank_the_batch() {
    let good = schedule(
        16,
        "01/01/2025 00:00:00",
        "07/01/2025 23:59:59",
        Some("3"),
        "09:00:00",
        "10:00:00",
    );
    let bad = schedule(17, "", "", Some("3"), "09:00:00", "10:00:00");

    let events = expand_schedules(
        &[bad, good],
        &range("2025-01-01", "2025-01-07"),
        &signage_calendar::NoopSink,
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "16-2025-01-01");
}

// ---------------------------------------------------------------------------
// Colors and passthrough
// ---------------------------------------------------------------------------

#[test]
fn events_carry_classifier_colors_and_metadata() {
    let mut s = schedule(
        18,
        "01/01/2025 00:00:00",
        "07/01/2025 23:59:59",
        Some("3"),
        "09:00:00",
        "10:00:00",
    );
    s.color_index = Some(3);
    s.campaign_name = Some("Spring sale".to_string());
    s.location_name = Some("Main street".to_string());
    s.priority = Some(serde_json::json!(2));

    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events.len(), 1);
    let event = &events[0];

    assert_eq!(event.background_color, PALETTE[3].background);
    assert_eq!(event.border_color, PALETTE[3].border);
    assert_eq!(event.text_color, PALETTE[3].text);
    assert_eq!(event.title, "Schedule 18");
    assert_eq!(event.resource_id, Some(10));
    assert_eq!(event.extended_props.campaign_name.as_deref(), Some("Spring sale"));
    assert_eq!(event.extended_props.location_name.as_deref(), Some("Main street"));
    assert_eq!(event.extended_props.priority, Some(serde_json::json!(2)));
    assert!(event.extended_props.overlap.is_none());
}

#[test]
fn overlay_schedule_uses_overlay_colors() {
    let mut s = schedule(
        19,
        "01/01/2025 00:00:00",
        "07/01/2025 23:59:59",
        Some("3"),
        "09:00:00",
        "10:00:00",
    );
    s.content_type = ContentType::Overlay;
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-07"));
    assert_eq!(events[0].background_color, palette::OVERLAY.background);
}

#[test]
fn serialized_event_uses_calendar_field_names() {
    let s = schedule(
        20,
        "01/01/2025 00:00:00",
        "01/01/2025 23:59:59",
        Some("3"),
        "09:00:00",
        "10:00:00",
    );
    let events = expand_schedule(&s, &range("2025-01-01", "2025-01-01"));
    let value = serde_json::to_value(&events[0]).unwrap();

    assert_eq!(value["id"], "20-2025-01-01");
    assert_eq!(value["start"], "2025-01-01T09:00:00");
    assert_eq!(value["end"], "2025-01-01T10:00:00");
    assert_eq!(value["allDay"], false);
    assert_eq!(value["resourceId"], 10);
    assert!(value["backgroundColor"].is_string());
    assert_eq!(value["extendedProps"]["scheduleId"], 20);
    assert_eq!(value["extendedProps"]["part"], "single");
    assert!(value["extendedProps"].get("overlap").is_none());
}
