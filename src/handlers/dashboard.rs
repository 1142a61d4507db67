use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;

use crate::auth::middleware::AuthUser;
use crate::calendar::range::period_bounds;
use crate::calendar::{aggregate, mood_comparison, weekday_distribution, Granularity, TimeContext};
use crate::db::{days, users};
use crate::dto::{DashboardQuery, DashboardResponse};
use crate::error::AppResult;
use crate::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let ctx = users::time_context(&state.db, auth_user.id, &state.config).await?;
    let (start, end) = dashboard_range(&query, &ctx);

    // An inverted range yields no records and therefore an empty summary
    let records = days::fetch_day_records(&state.db, auth_user.id, start, end).await?;

    tracing::debug!(
        user_id = %auth_user.id,
        start = %start,
        end = %end,
        records = records.len(),
        "Dashboard aggregated"
    );

    Ok(Json(DashboardResponse {
        start_date: start,
        end_date: end,
        summary: aggregate(&records),
        comparison: mood_comparison(&records, query.overlay_event),
        weekday_distribution: weekday_distribution(&records),
    }))
}

/// Requested range, defaulting to the user's current calendar year.
fn dashboard_range(query: &DashboardQuery, ctx: &TimeContext) -> (NaiveDate, NaiveDate) {
    let (year_start, year_end) =
        period_bounds(ctx.today, Granularity::Year).unwrap_or((ctx.today, ctx.today));
    (
        query.start_date.unwrap_or(year_start),
        query.end_date.unwrap_or(year_end),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> TimeContext {
        TimeContext::new(
            chrono_tz::UTC,
            Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap(),
        )
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_range_defaults_to_current_year() {
        let query = DashboardQuery {
            start_date: None,
            end_date: None,
            overlay_event: None,
        };
        assert_eq!(dashboard_range(&query, &ctx()), (d(2024, 1, 1), d(2024, 12, 31)));
    }

    #[test]
    fn test_range_keeps_explicit_bounds() {
        let query = DashboardQuery {
            start_date: Some(d(2023, 3, 1)),
            end_date: None,
            overlay_event: None,
        };
        assert_eq!(dashboard_range(&query, &ctx()), (d(2023, 3, 1), d(2024, 12, 31)));
    }
}
