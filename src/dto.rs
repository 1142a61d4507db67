//! # Year in Pixels: calendar and dashboard DTOs
//!
//! Query and response shapes for the read-side endpoints. CRUD bodies live
//! next to their row types in `models`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::aggregate::MoodComparison;
use crate::calendar::range::MonthGroup;
use crate::calendar::attachments::Attachments;
use crate::calendar::{
    day_key, project_color, Background, Event, FilterOutcome, Granularity, Mood, RangeSummary,
};

// ============================================================================
// Common
// ============================================================================

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

// ============================================================================
// Days
// ============================================================================

/// A single day with its attachments resolved, as returned by the day
/// endpoints. Days without a record come back empty rather than 404.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub key: String,
    pub moods: Vec<Mood>,
    pub events: Vec<Event>,
    pub background: Background,
}

impl DayView {
    pub fn new(date: NaiveDate, attachments: Attachments) -> Self {
        Self {
            date,
            key: day_key(&date),
            background: project_color(&attachments.mood_colors()),
            moods: attachments.moods,
            events: attachments.events,
        }
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// GET /api/calendar
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Any date inside the wanted month or year. Default: today
    pub date: Option<NaiveDate>,
    /// Default: month
    pub granularity: Option<Granularity>,
    /// Active color filter, exact color value
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub key: String,
    pub weekday: u32,
    pub outside_period: bool,
    pub is_today: bool,
    pub is_future: bool,
    pub moods: Vec<Mood>,
    pub events: Vec<Event>,
    pub background: Background,
    pub matches_filter: bool,
    pub has_diary: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub granularity: Granularity,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub today: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub cells: Vec<CalendarCell>,
    /// Only filled for the year view
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub month_groups: Vec<MonthGroup>,
}

/// POST /api/calendar/select
#[derive(Debug, Deserialize)]
pub struct SelectDayRequest {
    pub date: NaiveDate,
    pub active_filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectDayResponse {
    pub selected_date: NaiveDate,
    pub outcome: FilterOutcome,
    /// Filter to apply after this click
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /api/dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Default: January 1st of the current year
    pub start_date: Option<NaiveDate>,
    /// Default: December 31st of the current year
    pub end_date: Option<NaiveDate>,
    /// Event to overlay on the mood comparison
    pub overlay_event: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub summary: RangeSummary,
    pub comparison: MoodComparison,
    /// Logged days per weekday, Monday first
    pub weekday_distribution: [u32; 7],
}
