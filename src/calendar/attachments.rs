//! Typed day records and the per-day attachment lookup.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color::MoodColor;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mood {
    pub id: Uuid,
    pub name: String,
    pub color: MoodColor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayAttachment {
    Mood(Mood),
    Event(Event),
}

/// One user's pixel for one calendar date. Attachments keep the order they
/// were attached in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub attachments: Vec<DayAttachment>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DayRecord {
    pub fn moods(&self) -> impl Iterator<Item = &Mood> {
        self.attachments.iter().filter_map(|a| match a {
            DayAttachment::Mood(m) => Some(m),
            DayAttachment::Event(_) => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.attachments.iter().filter_map(|a| match a {
            DayAttachment::Event(e) => Some(e),
            DayAttachment::Mood(_) => None,
        })
    }

    pub fn mood_colors(&self) -> Vec<String> {
        self.moods().map(|m| m.color.value.clone()).collect()
    }
}

/// Anything that identifies a calendar date. Time-of-day is discarded.
pub trait CalendarDate {
    fn calendar_date(&self) -> NaiveDate;
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDate for NaiveDateTime {
    fn calendar_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn calendar_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// `yyyy-MM-dd` key used for all per-day lookups.
pub fn day_key<D: CalendarDate + ?Sized>(day: &D) -> String {
    day.calendar_date().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Attachments {
    pub moods: Vec<Mood>,
    pub events: Vec<Event>,
}

impl Attachments {
    /// A day counts as logged once it carries a mood or an event.
    pub fn is_logged(&self) -> bool {
        !self.moods.is_empty() || !self.events.is_empty()
    }

    pub fn mood_colors(&self) -> Vec<String> {
        self.moods.iter().map(|m| m.color.value.clone()).collect()
    }

    /// Append attachments in order, keeping each mood and event once.
    fn absorb(&mut self, attachments: &[DayAttachment]) {
        for attachment in attachments {
            match attachment {
                DayAttachment::Mood(mood) => {
                    if !self.moods.iter().any(|m| m.id == mood.id) {
                        self.moods.push(mood.clone());
                    }
                }
                DayAttachment::Event(event) => {
                    if !self.events.iter().any(|e| e.id == event.id) {
                        self.events.push(event.clone());
                    }
                }
            }
        }
    }
}

/// Collapse records onto their calendar date.
///
/// Dates come out in first-seen order. Records sharing a date are merged and
/// a mood or event linked twice on the same date is kept once.
pub fn merge_by_day(records: &[DayRecord]) -> Vec<(NaiveDate, Attachments)> {
    let mut slots: HashMap<NaiveDate, usize> = HashMap::with_capacity(records.len());
    let mut days: Vec<(NaiveDate, Attachments)> = Vec::with_capacity(records.len());

    for record in records {
        let slot = *slots.entry(record.date).or_insert_with(|| {
            days.push((record.date, Attachments::default()));
            days.len() - 1
        });
        days[slot].1.absorb(&record.attachments);
    }

    days
}

/// In-memory index over the day records already fetched for a range.
#[derive(Debug, Default)]
pub struct DayIndex {
    by_day: HashMap<String, Attachments>,
}

impl DayIndex {
    pub fn build(records: &[DayRecord]) -> Self {
        let by_day = merge_by_day(records)
            .into_iter()
            .map(|(date, attachments)| (day_key(&date), attachments))
            .collect();

        Self { by_day }
    }

    pub fn attachments_for<D: CalendarDate + ?Sized>(&self, day: &D) -> Attachments {
        self.by_day.get(&day_key(day)).cloned().unwrap_or_default()
    }
}

pub fn attachments_for<D: CalendarDate + ?Sized>(day: &D, records: &[DayRecord]) -> Attachments {
    let key = day_key(day);
    let mut found = Attachments::default();

    for record in records.iter().filter(|r| day_key(&r.date) == key) {
        found.absorb(&record.attachments);
    }

    found
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn mood(name: &str, color: &str) -> Mood {
        Mood {
            id: Uuid::new_v4(),
            name: name.into(),
            color: MoodColor::new(name, color),
        }
    }

    pub fn event(name: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn record(date: NaiveDate, moods: &[&Mood], events: &[&Event]) -> DayRecord {
        let attachments = moods
            .iter()
            .map(|m| DayAttachment::Mood((*m).clone()))
            .chain(events.iter().map(|e| DayAttachment::Event((*e).clone())))
            .collect();
        DayRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date,
            attachments,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
