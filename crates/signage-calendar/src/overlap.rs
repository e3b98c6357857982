//! Detect overlapping events for one resource and color them by schedule.
//!
//! Two spans overlap when `a.start < b.end && b.start < a.end`. Touching
//! endpoints (one ends exactly when the other starts) are NOT overlaps.
//!
//! Detection is a pairwise O(n²) scan. It runs on one player's visible events
//! at a time, which is tens of items, not thousands; replacing it with an
//! interval tree needs that bound re-checked first.
//!
//! This is the client-side fallback. Server-computed conflict metadata (see
//! [`crate::classifier`]) is preferred because the backend sees conflicts
//! across resources that a per-player pairwise check cannot.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::palette::{self, Colors, PALETTE};
use crate::schedule::CalendarEvent;

/// Anything with a half-open time span.
pub trait Span {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime);

    /// Stable id used to pick a color. `None` falls back to the input position.
    fn schedule_id(&self) -> Option<u64> {
        None
    }
}

impl Span for CalendarEvent {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.start, self.end)
    }

    fn schedule_id(&self) -> Option<u64> {
        Some(self.extended_props.schedule_id)
    }
}

impl<T: Span + ?Sized> Span for &T {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        (**self).span()
    }

    fn schedule_id(&self) -> Option<u64> {
        (**self).schedule_id()
    }
}

impl Span for (NaiveDateTime, NaiveDateTime) {
    fn span(&self) -> (NaiveDateTime, NaiveDateTime) {
        *self
    }
}

/// Whether two spans intersect. Symmetric; adjacent spans do not overlap.
pub fn has_time_overlap<A, B>(a: &A, b: &B) -> bool
where
    A: Span + ?Sized,
    B: Span + ?Sized,
{
    let (a_start, a_end) = a.span();
    let (b_start, b_end) = b.span();
    a_start < b_end && b_start < a_end
}

/// Overlap annotation for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapInfo {
    pub has_overlap: bool,
    /// Number of other items this one intersects.
    pub overlap_level: usize,
    /// Schedule ids of intersecting items, first-seen order, no duplicates.
    pub overlapping_ids: Vec<u64>,
    pub colors: Colors,
}

/// One intersecting pair, by input index (`first < second`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapPair {
    pub first: usize,
    pub second: usize,
    pub overlap_minutes: i64,
}

/// Every intersecting pair in `items`, in index order.
pub fn overlapping_pairs<T: Span>(items: &[T]) -> Vec<OverlapPair> {
    let mut pairs = Vec::new();
    for (i, a) in items.iter().enumerate() {
        for (j, b) in items.iter().enumerate().skip(i + 1) {
            if has_time_overlap(a, b) {
                let (a_start, a_end) = a.span();
                let (b_start, b_end) = b.span();
                let overlap_minutes = (a_end.min(b_end) - a_start.max(b_start)).num_minutes();
                pairs.push(OverlapPair {
                    first: i,
                    second: j,
                    overlap_minutes,
                });
            }
        }
    }
    pairs
}

/// Annotate each item with its overlaps. The result is parallel to `items`.
///
/// Items with no overlap get [`palette::NO_OVERLAP`]. Overlapping items get
/// `PALETTE[schedule_id % 12]` (input index when there is no id), so a schedule
/// keeps its color regardless of input order or which group it lands in.
pub fn detect_overlaps<T: Span>(items: &[T]) -> Vec<OverlapInfo> {
    let mut infos: Vec<OverlapInfo> = (0..items.len())
        .map(|_| OverlapInfo {
            has_overlap: false,
            overlap_level: 0,
            overlapping_ids: Vec::new(),
            colors: palette::NO_OVERLAP,
        })
        .collect();

    for pair in overlapping_pairs(items) {
        link(&mut infos[pair.first], items[pair.second].schedule_id());
        link(&mut infos[pair.second], items[pair.first].schedule_id());
    }

    for (index, (info, item)) in infos.iter_mut().zip(items).enumerate() {
        if info.has_overlap {
            info.colors = overlap_color(item.schedule_id(), index);
        }
    }
    infos
}

fn link(info: &mut OverlapInfo, other: Option<u64>) {
    info.has_overlap = true;
    info.overlap_level += 1;
    if let Some(id) = other {
        if !info.overlapping_ids.contains(&id) {
            info.overlapping_ids.push(id);
        }
    }
}

fn overlap_color(schedule_id: Option<u64>, index: usize) -> Colors {
    let len = PALETTE.len();
    match schedule_id {
        Some(id) => PALETTE[(id % len as u64) as usize],
        None => PALETTE[index % len],
    }
}

/// Run [`detect_overlaps`] over `events` and write colors and annotations back.
pub fn annotate_overlaps(events: &mut [CalendarEvent]) {
    let infos = detect_overlaps(&*events);
    for (event, info) in events.iter_mut().zip(infos) {
        event.set_colors(info.colors);
        event.extended_props.overlap = Some(info);
    }
}
