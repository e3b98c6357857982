//! Schedule expansion -- turns one schedule definition into concrete calendar events.
//!
//! A schedule is valid between `start_date` and `end_date`, active on a set of
//! weekdays, and plays during a daily window. Expansion walks every visible
//! day inside the validity window and emits one event per active day, or two
//! when the window crosses midnight. An occurrence that starts at or after
//! `end_date`, or ends at or before `start_date`, is dropped.
//!
//! Malformed dates or times never fail the caller: the schedule produces no
//! events and the sink hears about it. One bad record must not blank the whole
//! calendar.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::classifier;
use crate::diagnostics::{Diagnostic, DiagnosticSink, NoopSink};
use crate::palette::Colors;
use crate::schedule::{
    self, event_id, CalendarEvent, DateRange, EventProps, OccurrencePart, Schedule,
};
use crate::weekday;

/// Daily window shape, decided once per schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DailyWindow {
    AllDay,
    SameDay(NaiveTime, NaiveTime),
    Overnight(NaiveTime, NaiveTime),
}

impl DailyWindow {
    fn classify(schedule: &Schedule, start: NaiveTime, end: NaiveTime) -> Self {
        if schedule.is_all_day() {
            DailyWindow::AllDay
        } else if start <= end {
            DailyWindow::SameDay(start, end)
        } else {
            DailyWindow::Overnight(start, end)
        }
    }
}

/// Expand `schedule` into the events visible in `range`.
///
/// Equivalent to [`expand_schedule_with_sink`] with a [`NoopSink`].
pub fn expand_schedule(schedule: &Schedule, range: &DateRange) -> Vec<CalendarEvent> {
    expand_schedule_with_sink(schedule, range, &NoopSink)
}

/// Expand `schedule` into the events visible in `range`, reporting malformed
/// input to `sink`.
///
/// Events come out in ascending day order; for an overnight window the part
/// before midnight precedes the part after it. The same inputs always produce
/// the same ids in the same order.
pub fn expand_schedule_with_sink(
    schedule: &Schedule,
    range: &DateRange,
    sink: &dyn DiagnosticSink,
) -> Vec<CalendarEvent> {
    let Some((window, (valid_from, valid_until))) = effective_window(schedule, range, sink) else {
        return Vec::new();
    };

    let (start_time, end_time) = match parse_times(schedule, sink) {
        Some(times) => times,
        None => return Vec::new(),
    };

    let days = weekday::parse_days_of_week(schedule.days_of_week.as_deref(), sink);
    let shape = DailyWindow::classify(schedule, start_time, end_time);
    let colors = classifier::classify(schedule);

    let mut events = Vec::new();
    for day in window.days().filter(|d| days.contains(d.weekday())) {
        match shape {
            DailyWindow::AllDay => {
                events.push(occurrence(
                    schedule,
                    colors,
                    day,
                    day,
                    (schedule::DAY_START, schedule::DAY_END),
                    OccurrencePart::AllDay,
                ));
            }
            DailyWindow::SameDay(start, end) => {
                events.push(occurrence(
                    schedule,
                    colors,
                    day,
                    day,
                    (start, end),
                    OccurrencePart::Single,
                ));
            }
            DailyWindow::Overnight(start, end) => {
                events.push(occurrence(
                    schedule,
                    colors,
                    day,
                    day,
                    (start, schedule::DAY_END),
                    OccurrencePart::OvernightStart,
                ));
                if let Some(next) = day.succ_opt().filter(|next| *next <= window.end) {
                    events.push(occurrence(
                        schedule,
                        colors,
                        day,
                        next,
                        (schedule::DAY_START, end),
                        OccurrencePart::OvernightEnd,
                    ));
                }
            }
        }
    }

    events.retain(|event| event.start < valid_until && event.end > valid_from);
    events
}

/// Expand every schedule, concatenating results in input order.
pub fn expand_schedules(
    schedules: &[Schedule],
    range: &DateRange,
    sink: &dyn DiagnosticSink,
) -> Vec<CalendarEvent> {
    schedules
        .iter()
        .flat_map(|s| expand_schedule_with_sink(s, range, sink))
        .collect()
}

/// Days of the visible range touched by the validity window, plus the
/// validity bounds themselves.
fn effective_window(
    schedule: &Schedule,
    range: &DateRange,
    sink: &dyn DiagnosticSink,
) -> Option<(DateRange, (NaiveDateTime, NaiveDateTime))> {
    let start = parse_date_field(
        schedule,
        "start_date",
        &schedule.start_date,
        schedule::parse_schedule_datetime,
        sink,
    )?;
    let end = parse_date_field(
        schedule,
        "end_date",
        &schedule.end_date,
        schedule::parse_schedule_end,
        sink,
    )?;

    let effective = DateRange::new(range.start.max(start.date()), range.end.min(end.date()));
    if effective.start > effective.end || start >= end {
        sink.record(&Diagnostic::EmptyWindow {
            schedule_id: schedule.id,
        });
        return None;
    }
    Some((effective, (start, end)))
}

fn parse_date_field(
    schedule: &Schedule,
    field: &'static str,
    value: &str,
    parse: fn(&str) -> crate::error::Result<NaiveDateTime>,
    sink: &dyn DiagnosticSink,
) -> Option<NaiveDateTime> {
    match parse(value) {
        Ok(dt) => Some(dt),
        Err(_) => {
            sink.record(&Diagnostic::MalformedDate {
                schedule_id: schedule.id,
                field,
                value: value.to_string(),
            });
            None
        }
    }
}

fn parse_times(schedule: &Schedule, sink: &dyn DiagnosticSink) -> Option<(NaiveTime, NaiveTime)> {
    let parse = |field: &'static str, value: &str| match schedule::parse_schedule_time(value) {
        Ok(t) => Some(t),
        Err(_) => {
            sink.record(&Diagnostic::MalformedTime {
                schedule_id: schedule.id,
                field,
                value: value.to_string(),
            });
            None
        }
    };
    let start = parse("start_time", &schedule.start_time)?;
    let end = parse("end_time", &schedule.end_time)?;
    Some((start, end))
}

/// Event for `schedule` keyed by `day`, placed on `on` (the next day for the
/// after-midnight part).
fn occurrence(
    schedule: &Schedule,
    colors: Colors,
    day: NaiveDate,
    on: NaiveDate,
    (start, end): (NaiveTime, NaiveTime),
    part: OccurrencePart,
) -> CalendarEvent {
    CalendarEvent {
        id: event_id(schedule.id, day, part),
        title: schedule.name.clone(),
        start: on.and_time(start),
        end: on.and_time(end),
        all_day: part == OccurrencePart::AllDay,
        background_color: colors.background,
        border_color: colors.border,
        text_color: colors.text,
        resource_id: schedule.player_id,
        extended_props: EventProps::from_schedule(schedule, part),
    }
}
