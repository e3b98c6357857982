//! WASM bindings for signage-calendar.
//!
//! Exposes schedule expansion, client-side overlap detection and conflict
//! classification to the dashboard via `wasm-bindgen`. All complex types are
//! passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p signage-calendar-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir dashboard/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/signage_calendar_wasm.wasm
//! ```

use std::cell::RefCell;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use signage_calendar::diagnostics::{Diagnostic, DiagnosticSink};
use signage_calendar::palette::Colors;
use signage_calendar::schedule::{parse_schedules_json_with_sink, Schedule};
use signage_calendar::{ColorRule, DateRange, OverlapInfo, Span, ViewOptions};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for events passed from JavaScript.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventInput {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    schedule_id: Option<u64>,
    start: String,
    end: String,
}

struct ParsedEvent {
    id: Option<String>,
    schedule_id: Option<u64>,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Span for ParsedEvent {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.start, self.end)
    }

    fn schedule_id(&self) -> Option<u64> {
        self.schedule_id
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlapDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    overlap: OverlapInfo,
}

#[derive(Serialize)]
struct ClassificationDto {
    rule: ColorRule,
    colors: Colors,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string as a wall-clock time.
///
/// Accepts RFC 3339 (the offset is dropped, local time kept) and naive
/// `YYYY-MM-DDTHH:MM:SS`.
fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_events_json(json: &str) -> Result<Vec<ParsedEvent>, String> {
    let inputs: Vec<EventInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            Ok(ParsedEvent {
                start: parse_datetime(&input.start)?,
                end: parse_datetime(&input.end)?,
                id: input.id,
                schedule_id: input.schedule_id,
            })
        })
        .collect()
}

fn parse_inputs(
    schedules_json: &str,
    from: &str,
    to: &str,
    sink: &dyn DiagnosticSink,
) -> Result<(Vec<Schedule>, DateRange), String> {
    let schedules = parse_schedules_json_with_sink(schedules_json, sink)
        .map_err(|e| format!("Invalid schedules JSON: {}", e))?;
    let range = DateRange::parse(from, to).map_err(|e| e.to_string())?;
    Ok((schedules, range))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn expand_impl(
    schedules_json: &str,
    from: &str,
    to: &str,
    options_json: Option<&str>,
) -> Result<String, String> {
    let (schedules, range) =
        parse_inputs(schedules_json, from, to, &signage_calendar::NoopSink)?;
    let options = match options_json {
        Some(json) if !json.trim().is_empty() => {
            ViewOptions::from_json(json).map_err(|e| format!("Invalid options JSON: {}", e))?
        }
        _ => ViewOptions::default(),
    };
    let events =
        signage_calendar::build_calendar(&schedules, &range, &options, &signage_calendar::NoopSink);
    to_json(&events)
}

fn diagnostics_impl(schedules_json: &str, from: &str, to: &str) -> Result<String, String> {
    let messages = RefCell::new(Vec::new());
    let sink = |d: &Diagnostic| {
        if d.is_malformed() {
            messages.borrow_mut().push(d.to_string());
        }
    };
    let (schedules, range) = parse_inputs(schedules_json, from, to, &sink)?;
    signage_calendar::expand_schedules(&schedules, &range, &sink);
    to_json(&messages.into_inner())
}

fn detect_overlaps_impl(events_json: &str) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let dtos: Vec<OverlapDto> = signage_calendar::detect_overlaps(&events)
        .into_iter()
        .zip(&events)
        .map(|(overlap, event)| OverlapDto {
            id: event.id.clone(),
            overlap,
        })
        .collect();
    to_json(&dtos)
}

fn classify_impl(schedule_json: &str) -> Result<String, String> {
    let schedule: Schedule =
        serde_json::from_str(schedule_json).map_err(|e| format!("Invalid schedule JSON: {}", e))?;
    to_json(&ClassificationDto {
        rule: signage_calendar::classify_rule(&schedule),
        colors: signage_calendar::classify(&schedule),
    })
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand a schedules payload into calendar events for the visible range.
///
/// `schedules_json` is a JSON array of backend schedules (or `{"data": [...]}`).
/// `from` and `to` are the first and last visible days (`YYYY-MM-DD`).
/// `options_json` optionally carries view options (`player_id`,
/// `conflict_source`, `include_overlay`). Returns a JSON array of events.
#[wasm_bindgen(js_name = "expandSchedules")]
pub fn expand_schedules(
    schedules_json: &str,
    from: &str,
    to: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    expand_impl(schedules_json, from, to, options_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Explain why schedules are missing from the calendar.
///
/// Returns a JSON array of messages, one per malformed record, field or
/// weekday entry.
#[wasm_bindgen(js_name = "scheduleDiagnostics")]
pub fn schedule_diagnostics(schedules_json: &str, from: &str, to: &str) -> Result<String, JsValue> {
    diagnostics_impl(schedules_json, from, to).map_err(|e| JsValue::from_str(&e))
}

/// Detect overlaps within one resource's events.
///
/// `events_json` is a JSON array of `{id?, scheduleId?, start, end}` objects.
/// Returns a parallel JSON array of `{id, hasOverlap, overlapLevel,
/// overlappingIds, colors}`.
#[wasm_bindgen(js_name = "detectOverlaps")]
pub fn detect_overlaps(events_json: &str) -> Result<String, JsValue> {
    detect_overlaps_impl(events_json).map_err(|e| JsValue::from_str(&e))
}

/// Classify one schedule's conflict metadata into `{rule, colors}`.
#[wasm_bindgen(js_name = "classifySchedule")]
pub fn classify_schedule(schedule_json: &str) -> Result<String, JsValue> {
    classify_impl(schedule_json).map_err(|e| JsValue::from_str(&e))
}
