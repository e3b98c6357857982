//! Schedule records from the backend and the calendar events built from them.
//!
//! Backend dates use `DD/MM/YYYY HH:MM:SS` and daily windows `HH:MM:SS`. The
//! strict parsers here return [`CalendarError`]; the expander turns those
//! errors into an empty expansion.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticSink, NoopSink};
use crate::error::{CalendarError, Result};
use crate::overlap::OverlapInfo;

/// `strftime` format of backend validity dates.
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
/// Date-only fallback accepted for validity dates (midnight assumed).
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// `strftime` format of daily window times.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Start of the all-day sentinel window.
pub const DAY_START: NaiveTime = NaiveTime::MIN;

/// Last second of a day; end of the all-day sentinel window and of overnight part 1.
pub const DAY_END: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

const ALL_DAY_START: &str = "00:00:00";
const ALL_DAY_END: &str = "23:59:59";

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of content a schedule plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Main,
    Overlay,
    #[serde(other)]
    Other,
}

/// Server-computed conflict classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Conflict,
    Overlay,
    #[serde(other)]
    Other,
}

/// Server-computed winner/loser of an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPriority {
    OverlapTop,
    OverlapBottom,
    Overlay,
    #[serde(other)]
    Other,
}

/// A schedule as returned by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub player_id: Option<u64>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    /// Comma-separated backend weekday numbers (0 = Sunday).
    #[serde(default)]
    pub days_of_week: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: ContentType,
    #[serde(default)]
    pub conflict_type: Option<ConflictType>,
    #[serde(default)]
    pub overlap_priority: Option<OverlapPriority>,
    #[serde(default)]
    pub color_index: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_persistent: bool,
    #[serde(default)]
    pub priority: Option<serde_json::Value>,
    #[serde(default)]
    pub campaign_name: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl Schedule {
    /// Parsed `start_date` and `end_date`. A date-only `end_date` covers its
    /// whole day.
    pub fn validity(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        Ok((
            parse_schedule_datetime(&self.start_date)?,
            parse_schedule_end(&self.end_date)?,
        ))
    }

    /// Parsed `start_time` and `end_time`.
    pub fn daily_window(&self) -> Result<(NaiveTime, NaiveTime)> {
        Ok((
            parse_schedule_time(&self.start_time)?,
            parse_schedule_time(&self.end_time)?,
        ))
    }

    /// Exactly `00:00:00` to `23:59:59` marks a schedule that runs all day.
    pub fn is_all_day(&self) -> bool {
        self.start_time.trim() == ALL_DAY_START && self.end_time.trim() == ALL_DAY_END
    }

    pub fn is_overlay(&self) -> bool {
        self.content_type == ContentType::Overlay
            || self.overlap_priority == Some(OverlapPriority::Overlay)
    }
}

/// Parse a backend validity date, `DD/MM/YYYY HH:MM:SS` or `DD/MM/YYYY`.
pub fn parse_schedule_datetime(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| CalendarError::InvalidDate(s.to_string()))
}

/// Parse a validity end bound. A date-only value ends at [`DAY_END`].
pub fn parse_schedule_end(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map(|d| d.and_time(DAY_END)))
        .map_err(|_| CalendarError::InvalidDate(s.to_string()))
}

/// Parse a daily window time, `HH:MM:SS` or `HH:MM`.
pub fn parse_schedule_time(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| CalendarError::InvalidTime(s.to_string()))
}

/// Parse a schedules payload: either a bare JSON array or `{"data": [...]}`.
///
/// Equivalent to [`parse_schedules_json_with_sink`] with a [`NoopSink`].
pub fn parse_schedules_json(json: &str) -> Result<Vec<Schedule>> {
    parse_schedules_json_with_sink(json, &NoopSink)
}

/// Parse a schedules payload record by record.
///
/// Only a payload that is not valid JSON, or not an array or `data` envelope,
/// is an error. A record that does not fit [`Schedule`] is skipped and
/// reported to `sink` as [`Diagnostic::MalformedRecord`].
pub fn parse_schedules_json_with_sink(
    json: &str,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<Schedule>> {
    let records = match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Array(records) => records,
        serde_json::Value::Object(mut envelope) => match envelope.remove("data") {
            Some(serde_json::Value::Array(records)) => records,
            _ => {
                return Err(CalendarError::InvalidPayload(
                    "object payload needs a \"data\" array".to_string(),
                ))
            }
        },
        other => {
            return Err(CalendarError::InvalidPayload(format!(
                "expected an array of schedules, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Schedule>(record) {
            Ok(schedule) => Some(schedule),
            Err(e) => {
                sink.record(&Diagnostic::MalformedRecord {
                    index,
                    error: e.to_string(),
                });
                None
            }
        })
        .collect())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Inclusive range of calendar days visible in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// An inverted range is allowed and simply contains no days.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse both bounds (`YYYY-MM-DD` or `DD/MM/YYYY`), rejecting `from > to`.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let start = parse_range_date(from)?;
        let end = parse_range_date(to)?;
        if start > end {
            return Err(CalendarError::InvalidRange(format!(
                "{} is after {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

fn parse_range_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_FORMAT))
        .or_else(|_| parse_schedule_datetime(trimmed).map(|dt| dt.date()))
        .map_err(|_| CalendarError::InvalidDate(s.to_string()))
}

/// Which slice of a schedule's day an event covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrencePart {
    AllDay,
    Single,
    /// Before midnight of an overnight window.
    OvernightStart,
    /// After midnight of an overnight window, on the following day.
    OvernightEnd,
}

impl OccurrencePart {
    pub fn id_suffix(self) -> Option<&'static str> {
        match self {
            OccurrencePart::AllDay => Some("allday"),
            OccurrencePart::Single => None,
            OccurrencePart::OvernightStart => Some("p1"),
            OccurrencePart::OvernightEnd => Some("p2"),
        }
    }
}

/// Build the event id for one (schedule, day, part) triple.
pub fn event_id(schedule_id: u64, day: NaiveDate, part: OccurrencePart) -> String {
    match part.id_suffix() {
        Some(suffix) => format!("{}-{}-{}", schedule_id, day.format("%Y-%m-%d"), suffix),
        None => format!("{}-{}", schedule_id, day.format("%Y-%m-%d")),
    }
}

/// Schedule metadata carried on every event for tooltips and click handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventProps {
    pub schedule_id: u64,
    pub schedule_name: String,
    pub player_id: Option<u64>,
    pub player_name: Option<String>,
    pub campaign_name: Option<String>,
    pub location_name: Option<String>,
    pub content_type: ContentType,
    pub conflict_type: Option<ConflictType>,
    pub overlap_priority: Option<OverlapPriority>,
    pub color_index: Option<i64>,
    pub is_persistent: bool,
    pub priority: Option<serde_json::Value>,
    pub days_of_week: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub part: OccurrencePart,
    /// Set only by client-side overlap detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<OverlapInfo>,
}

impl EventProps {
    pub fn from_schedule(schedule: &Schedule, part: OccurrencePart) -> Self {
        Self {
            schedule_id: schedule.id,
            schedule_name: schedule.name.clone(),
            player_id: schedule.player_id,
            player_name: schedule.player_name.clone(),
            campaign_name: schedule.campaign_name.clone(),
            location_name: schedule.location_name.clone(),
            content_type: schedule.content_type,
            conflict_type: schedule.conflict_type,
            overlap_priority: schedule.overlap_priority,
            color_index: schedule.color_index,
            is_persistent: schedule.is_persistent,
            priority: schedule.priority.clone(),
            days_of_week: schedule.days_of_week.clone(),
            start_time: schedule.start_time.clone(),
            end_time: schedule.end_time.clone(),
            part,
            overlap: None,
        }
    }
}

/// One concrete occurrence, in the shape the calendar component consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<u64>,
    pub extended_props: EventProps,
}

impl CalendarEvent {
    pub fn set_colors(&mut self, colors: crate::palette::Colors) {
        self.background_color = colors.background;
        self.border_color = colors.border;
        self.text_color = colors.text;
    }
}
