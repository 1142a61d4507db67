use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Days, NaiveDate};

use crate::auth::middleware::AuthUser;
use crate::calendar::attachments::{attachments_for, Attachments};
use crate::db::{days, users};
use crate::dto::DayView;
use crate::error::AppResult;
use crate::models::day::{DayListQuery, DayPage, UpsertDayRequest};
use crate::AppState;

/// Replace the moods and events of one day. Clearing both removes the day.
pub async fn upsert_day(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertDayRequest>,
) -> AppResult<Json<DayView>> {
    let record = days::upsert_day(&state.db, auth_user.id, &body).await?;

    let attachments = record
        .as_ref()
        .map(|r| attachments_for(&body.date, std::slice::from_ref(r)))
        .unwrap_or_default();

    Ok(Json(DayView::new(body.date, attachments)))
}

pub async fn get_day(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<DayView>> {
    let attachments = match days::fetch_day_record(&state.db, auth_user.id, date).await? {
        Some(record) => attachments_for(&date, &[record]),
        None => Attachments::default(),
    };

    Ok(Json(DayView::new(date, attachments)))
}

/// Paged table of logged days, newest first. Defaults to the last 30 days.
pub async fn list_days(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DayListQuery>,
) -> AppResult<Json<DayPage>> {
    let ctx = users::time_context(&state.db, auth_user.id, &state.config).await?;
    let (start, end) = list_range(&query, ctx.today);
    let (page, per_page) = query.pagination();

    let (records, total) =
        days::fetch_day_page(&state.db, auth_user.id, start, end, page, per_page).await?;

    Ok(Json(DayPage {
        days: records,
        page,
        per_page,
        total,
    }))
}

/// Requested range, defaulting to the 30 days before `today`.
fn list_range(query: &DayListQuery, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = query.end_date.unwrap_or(today);
    let start = query
        .start_date
        .unwrap_or_else(|| end.checked_sub_days(Days::new(30)).unwrap_or(NaiveDate::MIN));
    (start, end)
}
