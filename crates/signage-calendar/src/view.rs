//! Calendar view assembly.
//!
//! One entry point for every calendar screen: filter the fetched schedules,
//! expand them over the visible range, and color them either from server
//! conflict metadata (default) or by recomputing overlaps per player.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::expander;
use crate::overlap::{self, Span};
use crate::schedule::{CalendarEvent, DateRange, Schedule};

/// Where conflict coloring comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSource {
    /// Trust `color_index`, `conflict_type` and `overlap_priority` from the backend.
    #[default]
    Server,
    /// Deprecated fallback: recompute overlaps per player on the client.
    /// Cannot see conflicts across players.
    Client,
}

/// Knobs for [`build_calendar`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Show only this player's schedules.
    pub player_id: Option<u64>,
    pub conflict_source: ConflictSource,
    /// Show overlay content alongside main content.
    pub include_overlay: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            player_id: None,
            conflict_source: ConflictSource::Server,
            include_overlay: true,
        }
    }
}

impl ViewOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn accepts(&self, schedule: &Schedule) -> bool {
        if let Some(player) = self.player_id {
            if schedule.player_id != Some(player) {
                return false;
            }
        }
        self.include_overlay || !schedule.is_overlay()
    }
}

/// Build the events for one calendar view.
///
/// Output order is schedule input order, then day order within a schedule.
pub fn build_calendar(
    schedules: &[Schedule],
    range: &DateRange,
    options: &ViewOptions,
    sink: &dyn DiagnosticSink,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = schedules
        .iter()
        .filter(|s| options.accepts(s))
        .flat_map(|s| expander::expand_schedule_with_sink(s, range, sink))
        .collect();

    if options.conflict_source == ConflictSource::Client {
        annotate_per_player(&mut events);
    }
    events
}

/// Event indices grouped by player, ascending player id, unassigned last.
pub fn group_by_player(events: &[CalendarEvent]) -> Vec<(Option<u64>, Vec<usize>)> {
    let mut players: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
    let mut unassigned = Vec::new();
    for (index, event) in events.iter().enumerate() {
        match event.resource_id {
            Some(player) => players.entry(player).or_default().push(index),
            None => unassigned.push(index),
        }
    }

    let mut groups: Vec<(Option<u64>, Vec<usize>)> = players
        .into_iter()
        .map(|(player, indices)| (Some(player), indices))
        .collect();
    if !unassigned.is_empty() {
        groups.push((None, unassigned));
    }
    groups
}

fn annotate_per_player(events: &mut [CalendarEvent]) {
    for (_, indices) in group_by_player(events) {
        let mut group: Vec<CalendarEvent> = indices.iter().map(|&i| events[i].clone()).collect();
        overlap::annotate_overlaps(&mut group);
        for (index, event) in indices.into_iter().zip(group) {
            events[index] = event;
        }
    }
}

/// Two events on the same player that overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictPair {
    pub player_id: Option<u64>,
    pub first_event: String,
    pub second_event: String,
    pub first_schedule: u64,
    pub second_schedule: u64,
    /// Start of the shared interval.
    pub start: NaiveDateTime,
    /// End of the shared interval.
    pub end: NaiveDateTime,
    pub overlap_minutes: i64,
}

/// Every overlapping pair, checked per player.
pub fn conflict_report(events: &[CalendarEvent]) -> Vec<ConflictPair> {
    let mut report = Vec::new();
    for (player_id, indices) in group_by_player(events) {
        let group: Vec<&CalendarEvent> = indices.iter().map(|&i| &events[i]).collect();
        for pair in overlap::overlapping_pairs(&group) {
            let a = group[pair.first];
            let b = group[pair.second];
            let (a_start, a_end) = a.span();
            let (b_start, b_end) = b.span();
            report.push(ConflictPair {
                player_id,
                first_event: a.id.clone(),
                second_event: b.id.clone(),
                first_schedule: a.extended_props.schedule_id,
                second_schedule: b.extended_props.schedule_id,
                start: a_start.max(b_start),
                end: a_end.min(b_end),
                overlap_minutes: pair.overlap_minutes,
            });
        }
    }
    report
}
