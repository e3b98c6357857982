//! # signage-calendar
//!
//! Turns digital-signage schedules into calendar events.
//!
//! A schedule says which content plays on which player, on which weekdays and
//! during which daily window, between two validity dates. The calendar needs
//! one concrete event per occurrence inside the visible range, colored so that
//! conflicting schedules stand apart. Everything here is pure and synchronous:
//! the same schedules and range always produce the same events.
//!
//! ## Modules
//!
//! - [`schedule`]: backend schedule records, the calendar event shape, date ranges
//! - [`weekday`]: backend weekday numbers → `chrono::Weekday`
//! - [`expander`]: schedule + visible range → concrete calendar events
//! - [`overlap`]: pairwise overlap detection and per-schedule coloring
//! - [`palette`]: fixed color tables
//! - [`classifier`]: server conflict metadata → color pair
//! - [`view`]: per-player calendar assembly on top of the above
//! - [`diagnostics`]: injectable sink for malformed-input reports
//! - [`error`]: Error types

pub mod classifier;
pub mod diagnostics;
pub mod error;
pub mod expander;
pub mod overlap;
pub mod palette;
pub mod schedule;
pub mod view;
pub mod weekday;

pub use classifier::{classify, classify_rule, ColorRule};
pub use diagnostics::{Diagnostic, DiagnosticSink, NoopSink};
pub use error::CalendarError;
pub use expander::{expand_schedule, expand_schedule_with_sink, expand_schedules};
pub use overlap::{annotate_overlaps, detect_overlaps, has_time_overlap, OverlapInfo, Span};
pub use palette::Colors;
pub use schedule::{CalendarEvent, DateRange, Schedule};
pub use view::{build_calendar, conflict_report, ConflictSource, ViewOptions};
