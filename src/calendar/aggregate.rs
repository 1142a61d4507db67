//! Range summaries for the dashboard.
//!
//! Breakdowns are ordered by count, highest first. Equal counts keep the
//! order in which the mood (or event) was first encountered while walking the
//! input, so output is reproducible for a given record order.
//!
//! Records are first merged per calendar date, the same way the grid resolves
//! them, so a date appearing twice is still one day.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::attachments::{merge_by_day, DayRecord};
use super::range::weekday_index;

const NONE_MOOD_NAME: &str = "None";
const NONE_MOOD_COLOR: &str = "gray";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoodCount {
    pub id: Option<Uuid>,
    pub name: String,
    pub color: String,
    pub count: u32,
}

impl MoodCount {
    pub fn none() -> Self {
        Self {
            id: None,
            name: NONE_MOOD_NAME.into(),
            color: NONE_MOOD_COLOR.into(),
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventCount {
    pub id: Uuid,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RangeSummary {
    pub total_days: u32,
    pub mood_breakdown: Vec<MoodCount>,
    pub most_frequent_mood: MoodCount,
    pub event_breakdown: Vec<EventCount>,
}

/// Counts keyed by id, remembering first-seen order.
struct Tally<T> {
    order: Vec<T>,
    counts: HashMap<Uuid, usize>,
}

impl<T> Tally<T> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn bump(&mut self, id: Uuid, make: impl FnOnce() -> T, inc: impl FnOnce(&mut T)) {
        let slot = match self.counts.get(&id) {
            Some(&slot) => slot,
            None => {
                self.order.push(make());
                self.counts.insert(id, self.order.len() - 1);
                self.order.len() - 1
            }
        };
        inc(&mut self.order[slot]);
    }
}

pub fn aggregate(records: &[DayRecord]) -> RangeSummary {
    let mut moods: Tally<MoodCount> = Tally::new();
    let mut events: Tally<EventCount> = Tally::new();
    let mut total_days = 0u32;

    for (_, day) in merge_by_day(records) {
        if day.is_logged() {
            total_days += 1;
        }
        for mood in &day.moods {
            moods.bump(
                mood.id,
                || MoodCount {
                    id: Some(mood.id),
                    name: mood.name.clone(),
                    color: mood.color.value.clone(),
                    count: 0,
                },
                |m| m.count += 1,
            );
        }
        for event in &day.events {
            events.bump(
                event.id,
                || EventCount {
                    id: event.id,
                    name: event.name.clone(),
                    count: 0,
                },
                |e| e.count += 1,
            );
        }
    }

    let mut mood_breakdown = moods.order;
    mood_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let mut event_breakdown = events.order;
    event_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let most_frequent_mood = mood_breakdown.first().cloned().unwrap_or_else(MoodCount::none);

    RangeSummary {
        total_days,
        mood_breakdown,
        most_frequent_mood,
        event_breakdown,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoodComparisonRow {
    pub mood: MoodCount,
    /// Occurrences of this mood on days that also carry the overlay event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_event: Option<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoodComparison {
    /// Events selectable as an overlay, most frequent first.
    pub overlay_options: Vec<EventCount>,
    pub overlay: Option<EventCount>,
    pub rows: Vec<MoodComparisonRow>,
}

/// Mood counts, optionally split by whether a chosen event happened that day.
///
/// An overlay id that does not occur in the range is ignored and the
/// comparison falls back to plain mood counts.
pub fn mood_comparison(records: &[DayRecord], overlay_event: Option<Uuid>) -> MoodComparison {
    let summary = aggregate(records);

    let overlay = overlay_event.and_then(|id| {
        summary
            .event_breakdown
            .iter()
            .find(|e| e.id == id)
            .cloned()
    });

    let with_event: Option<HashMap<Uuid, u32>> = overlay.as_ref().map(|overlay| {
        let mut counts = HashMap::new();
        for (_, day) in merge_by_day(records) {
            if !day.events.iter().any(|e| e.id == overlay.id) {
                continue;
            }
            for mood in &day.moods {
                *counts.entry(mood.id).or_insert(0) += 1;
            }
        }
        counts
    });

    let rows = summary
        .mood_breakdown
        .into_iter()
        .map(|mood| {
            let overlay_count = with_event.as_ref().map(|counts| {
                mood.id
                    .and_then(|id| counts.get(&id).copied())
                    .unwrap_or(0)
            });
            MoodComparisonRow {
                mood,
                with_event: overlay_count,
            }
        })
        .collect();

    MoodComparison {
        overlay_options: summary.event_breakdown,
        overlay,
        rows,
    }
}

/// Logged days per weekday, Monday first.
pub fn weekday_distribution(records: &[DayRecord]) -> [u32; 7] {
    let mut counts = [0u32; 7];
    for (date, day) in merge_by_day(records) {
        if day.is_logged() {
            counts[weekday_index(date) as usize] += 1;
        }
    }
    counts
}
