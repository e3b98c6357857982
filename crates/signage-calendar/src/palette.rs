//! Fixed color tables used by the classifier and the overlap detector.
//!
//! All colors are compile-time constants; nothing here is configurable at
//! runtime, so a schedule renders identically across sessions.

use serde::Serialize;

/// Background, border and text color of one calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Colors {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

impl Colors {
    const fn new(background: &'static str, border: &'static str, text: &'static str) -> Self {
        Self {
            background,
            border,
            text,
        }
    }
}

/// Conflict-group palette. Indexed by server `color_index` or schedule id.
pub const PALETTE: [Colors; 12] = [
    Colors::new("#1976d2", "#0d47a1", "#ffffff"),
    Colors::new("#388e3c", "#1b5e20", "#ffffff"),
    Colors::new("#f57c00", "#e65100", "#ffffff"),
    Colors::new("#7b1fa2", "#4a148c", "#ffffff"),
    Colors::new("#c2185b", "#880e4f", "#ffffff"),
    Colors::new("#0097a7", "#006064", "#ffffff"),
    Colors::new("#5d4037", "#3e2723", "#ffffff"),
    Colors::new("#fbc02d", "#f57f17", "#000000"),
    Colors::new("#455a64", "#263238", "#ffffff"),
    Colors::new("#689f38", "#33691e", "#ffffff"),
    Colors::new("#303f9f", "#1a237e", "#ffffff"),
    Colors::new("#e64a19", "#bf360c", "#ffffff"),
];

/// Overlay content drawn on top of the main playlist.
pub const OVERLAY: Colors = Colors::new("#9c27b0", "#6a1b9a", "#ffffff");

/// Two main schedules competing for the same player and time.
pub const CRITICAL_CONFLICT: Colors = Colors::new("#d32f2f", "#b71c1c", "#ffffff");

/// The schedule that wins an overlap.
pub const HIGH_PRIORITY: Colors = Colors::new("#ff9800", "#f57c00", "#000000");

/// The schedule that loses an overlap.
pub const LOW_PRIORITY: Colors = Colors::new("#90a4ae", "#607d8b", "#000000");

/// A schedule with no conflict metadata.
pub const BASELINE: Colors = Colors::new("#4caf50", "#388e3c", "#ffffff");

/// An event the client-side detector found no overlap for.
pub const NO_OVERLAP: Colors = Colors::new("#2196f3", "#1976d2", "#ffffff");

/// Palette entry for any integer, wrapping negatives and oversized values.
pub fn palette_entry(index: i64) -> Colors {
    let len = PALETTE.len() as i64;
    PALETTE[index.rem_euclid(len) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_entry_wraps() {
        assert_eq!(palette_entry(0), PALETTE[0]);
        assert_eq!(palette_entry(12), PALETTE[0]);
        assert_eq!(palette_entry(15), PALETTE[3]);
        assert_eq!(palette_entry(-1), PALETTE[11]);
        assert_eq!(palette_entry(i64::MIN), palette_entry(i64::MIN.rem_euclid(12)));
        assert_eq!(palette_entry(i64::MAX), PALETTE[(i64::MAX % 12) as usize]);
    }
}
