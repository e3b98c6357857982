//! Diagnostic reporting for malformed schedule data.
//!
//! Expansion degrades silently: a schedule with a bad date simply produces no
//! events. Callers that want to know why can pass a [`DiagnosticSink`]. The
//! default [`NoopSink`] discards everything, so the pure functions stay free of
//! global logging.

use std::fmt;

/// One thing that went wrong (or was defaulted) while reading a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A payload record did not deserialize into a schedule.
    MalformedRecord { index: usize, error: String },
    /// `start_date` or `end_date` could not be parsed.
    MalformedDate {
        schedule_id: u64,
        field: &'static str,
        value: String,
    },
    /// `start_time` or `end_time` could not be parsed.
    MalformedTime {
        schedule_id: u64,
        field: &'static str,
        value: String,
    },
    /// A `days_of_week` entry was not a backend weekday number.
    DroppedWeekday { value: String },
    /// `days_of_week` was missing or blank; the work week was used.
    DefaultedWeekdays,
    /// The schedule's validity window does not intersect the visible range.
    EmptyWindow { schedule_id: u64 },
}

impl Diagnostic {
    /// Whether the diagnostic indicates bad data rather than a normal outcome.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Diagnostic::MalformedRecord { .. }
                | Diagnostic::MalformedDate { .. }
                | Diagnostic::MalformedTime { .. }
                | Diagnostic::DroppedWeekday { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedRecord { index, error } => {
                write!(f, "schedule record {}: {}", index, error)
            }
            Diagnostic::MalformedDate {
                schedule_id,
                field,
                value,
            } => write!(f, "schedule {}: malformed {} {:?}", schedule_id, field, value),
            Diagnostic::MalformedTime {
                schedule_id,
                field,
                value,
            } => write!(f, "schedule {}: malformed {} {:?}", schedule_id, field, value),
            Diagnostic::DroppedWeekday { value } => {
                write!(f, "dropped days_of_week entry {:?}", value)
            }
            Diagnostic::DefaultedWeekdays => {
                write!(f, "days_of_week missing; defaulting to Monday-Friday")
            }
            Diagnostic::EmptyWindow { schedule_id } => {
                write!(f, "schedule {}: outside the visible range", schedule_id)
            }
        }
    }
}

/// Receives diagnostics produced during expansion.
pub trait DiagnosticSink {
    fn record(&self, diagnostic: &Diagnostic);
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _diagnostic: &Diagnostic) {}
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic),
{
    fn record(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Forwards diagnostics to `tracing`: bad data at `warn`, the rest at `debug`.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        if diagnostic.is_malformed() {
            tracing::warn!(%diagnostic, "skipping malformed schedule data");
        } else {
            tracing::debug!(%diagnostic, "schedule expansion");
        }
    }
}
