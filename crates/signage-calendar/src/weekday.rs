//! Backend weekday numbering.
//!
//! The backend numbers days 0 = Sunday, 1 = Monday .. 6 = Saturday. On the ISO
//! week used here Sunday is the last day (7), so `0` is remapped to 7 and
//! `1..=6` pass through unchanged.

use chrono::Weekday;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Mask used when a schedule carries no `days_of_week`.
pub const DEFAULT_DAYS_OF_WEEK: &str = "1,2,3,4,5";

/// Convert one backend weekday number to its ISO day number (Mon = 1 .. Sun = 7).
pub fn backend_to_iso(value: u8) -> Option<u8> {
    match value {
        0 => Some(7),
        1..=6 => Some(value),
        _ => None,
    }
}

/// Convert one backend weekday number to a [`Weekday`].
pub fn backend_to_weekday(value: u8) -> Option<Weekday> {
    let iso = backend_to_iso(value)?;
    Weekday::try_from(iso - 1).ok()
}

/// A set of weekdays, stored as a 7-bit mask indexed from Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in ISO order, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        (0..7u8)
            .filter_map(|n| Weekday::try_from(n).ok())
            .filter(|d| self.contains(*d))
    }
}

/// Parse a comma-separated backend weekday list.
///
/// A missing or blank value yields Monday-Friday. Entries that are not
/// integers in `0..=6` are dropped and reported; if every entry is dropped the
/// set is empty and the schedule produces no events.
pub fn parse_days_of_week(raw: Option<&str>, sink: &dyn DiagnosticSink) -> WeekdaySet {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            sink.record(&Diagnostic::DefaultedWeekdays);
            DEFAULT_DAYS_OF_WEEK
        }
    };

    let mut set = WeekdaySet::EMPTY;
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.parse::<u8>().ok().and_then(backend_to_weekday) {
            Some(day) => set.insert(day),
            None => sink.record(&Diagnostic::DroppedWeekday {
                value: entry.to_string(),
            }),
        }
    }
    set
}
