//! Map server-supplied conflict metadata to a presentation color.
//!
//! The backend sees every player's schedules at once, so its `color_index`,
//! `conflict_type` and `overlap_priority` are the primary source of conflict
//! coloring. The rules form an ordered decision table: the first rule that
//! matches wins, and [`ColorRule::ORDER`] is that order.

use serde::Serialize;

use crate::palette::{self, Colors};
use crate::schedule::{ConflictType, OverlapPriority, Schedule};

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRule {
    /// Overlay content, by content type or overlap priority.
    Overlay,
    /// A positive server `color_index` selects a palette entry.
    IndexedPalette,
    /// The server flagged a hard conflict.
    CriticalConflict,
    /// Winner of a server-resolved overlap.
    HighPriority,
    /// Loser of a server-resolved overlap.
    LowPriority,
    /// Nothing else matched.
    Baseline,
}

impl ColorRule {
    /// Evaluation order. Do not reorder.
    pub const ORDER: [ColorRule; 6] = [
        ColorRule::Overlay,
        ColorRule::IndexedPalette,
        ColorRule::CriticalConflict,
        ColorRule::HighPriority,
        ColorRule::LowPriority,
        ColorRule::Baseline,
    ];

    /// Colors for `schedule` if this rule applies to it.
    pub fn apply(self, schedule: &Schedule) -> Option<Colors> {
        match self {
            ColorRule::Overlay => schedule.is_overlay().then_some(palette::OVERLAY),
            ColorRule::IndexedPalette => schedule
                .color_index
                .filter(|&index| index > 0)
                .map(palette::palette_entry),
            ColorRule::CriticalConflict => {
                let hit = schedule.conflict_type == Some(ConflictType::Conflict);
                hit.then_some(palette::CRITICAL_CONFLICT)
            }
            ColorRule::HighPriority => {
                let hit = schedule.overlap_priority == Some(OverlapPriority::OverlapTop);
                hit.then_some(palette::HIGH_PRIORITY)
            }
            ColorRule::LowPriority => {
                let hit = schedule.overlap_priority == Some(OverlapPriority::OverlapBottom);
                hit.then_some(palette::LOW_PRIORITY)
            }
            ColorRule::Baseline => Some(palette::BASELINE),
        }
    }
}

/// The first rule in [`ColorRule::ORDER`] matching `schedule`.
pub fn classify_rule(schedule: &Schedule) -> ColorRule {
    ColorRule::ORDER
        .into_iter()
        .find(|rule| rule.apply(schedule).is_some())
        .unwrap_or(ColorRule::Baseline)
}

/// Presentation colors for `schedule`.
pub fn classify(schedule: &Schedule) -> Colors {
    ColorRule::ORDER
        .into_iter()
        .find_map(|rule| rule.apply(schedule))
        .unwrap_or(palette::BASELINE)
}
