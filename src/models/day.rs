use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::calendar::DayRecord;

pub const DEFAULT_PAGE_SIZE: u32 = 31;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, FromRow)]
pub struct DayRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mood link joined with its mood, as read for a batch of days.
#[derive(Debug, Clone, FromRow)]
pub struct MoodLinkRow {
    pub day_id: Uuid,
    pub position: i32,
    pub mood_id: Uuid,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventLinkRow {
    pub day_id: Uuid,
    pub position: i32,
    pub event_id: Uuid,
    pub name: String,
}

/// PUT /api/days: replaces the day's attachments wholesale. Order of the
/// id lists is kept as attachment order.
#[derive(Debug, Deserialize)]
pub struct UpsertDayRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub mood_ids: Vec<Uuid>,
    #[serde(default)]
    pub event_ids: Vec<Uuid>,
}

impl UpsertDayRequest {
    /// Id lists with repeats removed, first occurrence wins.
    pub fn deduplicated(&self) -> (Vec<Uuid>, Vec<Uuid>) {
        (dedup_keep_order(&self.mood_ids), dedup_keep_order(&self.event_ids))
    }
}

fn dedup_keep_order(ids: &[Uuid]) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

#[derive(Debug, Deserialize)]
pub struct DayListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl DayListQuery {
    /// (page, per_page) with page starting at 1.
    pub fn pagination(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, per_page)
    }
}

#[derive(Debug, Serialize)]
pub struct DayPage {
    pub days: Vec<DayRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_request_defaults_to_empty_lists() {
        let req: UpsertDayRequest = serde_json::from_str(r#"{"date":"2024-01-02"}"#).unwrap();
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(req.mood_ids.is_empty());
        assert!(req.event_ids.is_empty());
    }

    #[test]
    fn test_deduplicated_keeps_first_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let req = UpsertDayRequest {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            mood_ids: vec![b, a, b],
            event_ids: vec![a, a],
        };
        let (moods, events) = req.deduplicated();
        assert_eq!(moods, vec![b, a]);
        assert_eq!(events, vec![a]);
    }

    #[test]
    fn test_pagination_clamps() {
        let q = DayListQuery {
            start_date: None,
            end_date: None,
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(q.pagination(), (1, MAX_PAGE_SIZE));

        let q = DayListQuery {
            start_date: None,
            end_date: None,
            page: None,
            per_page: None,
        };
        assert_eq!(q.pagination(), (1, DEFAULT_PAGE_SIZE));
    }
}
