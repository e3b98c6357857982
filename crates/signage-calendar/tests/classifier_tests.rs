//! Tests for the ordered color decision table.

use signage_calendar::palette::{self, PALETTE};
use signage_calendar::schedule::{ConflictType, ContentType, OverlapPriority};
use signage_calendar::{classify, classify_rule, ColorRule, Schedule};

fn schedule() -> Schedule {
    Schedule {
        id: 1,
        name: "Menu board".to_string(),
        ..Schedule::default()
    }
}

#[test]
fn plain_schedule_is_baseline() {
    let s = schedule();
    assert_eq!(classify_rule(&s), ColorRule::Baseline);
    assert_eq!(classify(&s), palette::BASELINE);
}

#[test]
fn overlay_content_wins_over_everything() {
    let s = Schedule {
        content_type: ContentType::Overlay,
        color_index: Some(5),
        conflict_type: Some(ConflictType::Conflict),
        overlap_priority: Some(OverlapPriority::OverlapTop),
        ..schedule()
    };
    assert_eq!(classify_rule(&s), ColorRule::Overlay);
    assert_eq!(classify(&s), palette::OVERLAY);
}

#[test]
fn overlay_priority_counts_as_overlay() {
    let s = Schedule {
        overlap_priority: Some(OverlapPriority::Overlay),
        color_index: Some(2),
        ..schedule()
    };
    assert_eq!(classify(&s), palette::OVERLAY);
}

#[test]
fn color_index_beats_conflict_type() {
    let s = Schedule {
        color_index: Some(3),
        conflict_type: Some(ConflictType::Conflict),
        ..schedule()
    };
    assert_eq!(classify_rule(&s), ColorRule::IndexedPalette);
    assert_eq!(classify(&s), PALETTE[3]);
}

#[test]
fn color_index_wraps_around_palette() {
    let s = Schedule {
        color_index: Some(27),
        ..schedule()
    };
    assert_eq!(classify(&s), PALETTE[3]);

    let huge = Schedule {
        color_index: Some(i64::MAX),
        ..schedule()
    };
    assert_eq!(classify(&huge), PALETTE[(i64::MAX % 12) as usize]);
}

#[test]
fn zero_or_negative_index_falls_through() {
    for index in [0, -1, -12, i64::MIN] {
        let s = Schedule {
            color_index: Some(index),
            conflict_type: Some(ConflictType::Conflict),
            ..schedule()
        };
        assert_eq!(classify_rule(&s), ColorRule::CriticalConflict, "index {}", index);
        assert_eq!(classify(&s), palette::CRITICAL_CONFLICT);
    }
}

#[test]
fn conflict_beats_overlap_priority() {
    let s = Schedule {
        conflict_type: Some(ConflictType::Conflict),
        overlap_priority: Some(OverlapPriority::OverlapBottom),
        ..schedule()
    };
    assert_eq!(classify(&s), palette::CRITICAL_CONFLICT);
}

#[test]
fn overlap_top_and_bottom() {
    let top = Schedule {
        overlap_priority: Some(OverlapPriority::OverlapTop),
        ..schedule()
    };
    let bottom = Schedule {
        overlap_priority: Some(OverlapPriority::OverlapBottom),
        ..schedule()
    };
    assert_eq!(classify(&top), palette::HIGH_PRIORITY);
    assert_eq!(classify(&bottom), palette::LOW_PRIORITY);
}

#[test]
fn unknown_values_fall_to_baseline() {
    let s = Schedule {
        content_type: ContentType::Other,
        conflict_type: Some(ConflictType::Other),
        overlap_priority: Some(OverlapPriority::Other),
        ..schedule()
    };
    assert_eq!(classify(&s), palette::BASELINE);

    let overlay_conflict = Schedule {
        conflict_type: Some(ConflictType::Overlay),
        ..schedule()
    };
    assert_eq!(classify_rule(&overlay_conflict), ColorRule::Baseline);
}

#[test]
fn classification_is_deterministic() {
    let s = Schedule {
        color_index: Some(8),
        overlap_priority: Some(OverlapPriority::OverlapTop),
        ..schedule()
    };
    let copy = s.clone();
    assert_eq!(classify(&s), classify(&copy));
    assert_eq!(classify(&s), classify(&s));
}

#[test]
fn rule_order_is_fixed() {
    assert_eq!(
        ColorRule::ORDER,
        [
            ColorRule::Overlay,
            ColorRule::IndexedPalette,
            ColorRule::CriticalConflict,
            ColorRule::HighPriority,
            ColorRule::LowPriority,
            ColorRule::Baseline,
        ]
    );
}

#[test]
fn classify_agrees_with_matched_rule() {
    let cases = [
        schedule(),
        Schedule {
            color_index: Some(11),
            ..schedule()
        },
        Schedule {
            overlap_priority: Some(OverlapPriority::OverlapBottom),
            ..schedule()
        },
    ];
    for s in &cases {
        assert_eq!(classify_rule(s).apply(s), Some(classify(s)));
    }
}
