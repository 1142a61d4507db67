use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, NaiveDate};

use crate::auth::middleware::AuthUser;
use crate::calendar::attachments::Attachments;
use crate::calendar::range::period_bounds;
use crate::calendar::{
    day_key, expand_range, matches_filter, month_groups, project_color, resolve_click,
    CalendarDay, DayIndex, Granularity, TimeContext,
};
use crate::db::{days, users};
use crate::dto::{CalendarCell, CalendarQuery, CalendarResponse, SelectDayRequest, SelectDayResponse};
use crate::error::{AppError, AppResult};
use crate::handlers::diary::diary_dates;
use crate::AppState;

pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarResponse>> {
    let ctx = users::time_context(&state.db, auth_user.id, &state.config).await?;
    let reference = query.date.unwrap_or(ctx.today);
    let granularity = query.granularity.unwrap_or_default();

    let (start, end) = period_bounds(reference, granularity)
        .ok_or_else(|| AppError::Validation(format!("Date out of range: {reference}")))?;

    // One fetch for the whole visible period
    let records = days::fetch_day_records(&state.db, auth_user.id, start, end).await?;
    let index = DayIndex::build(&records);
    let with_diary: HashSet<NaiveDate> = diary_dates(&state, auth_user.id, start, end)
        .await?
        .into_iter()
        .collect();

    let filter = query.filter.filter(|f| !f.is_empty());
    let cells = build_cells(
        &expand_range(reference, granularity),
        &index,
        &with_diary,
        &ctx,
        filter.as_deref(),
    );

    tracing::debug!(
        user_id = %auth_user.id,
        start = %start,
        end = %end,
        records = records.len(),
        "Calendar built"
    );

    Ok(Json(CalendarResponse {
        granularity,
        start_date: start,
        end_date: end,
        today: ctx.today,
        filter,
        cells,
        month_groups: match granularity {
            Granularity::Year => month_groups(start.year()),
            Granularity::Month => Vec::new(),
        },
    }))
}

/// Turn grid days into rendered cells. Padding days never get attachments.
pub fn build_cells(
    grid: &[CalendarDay],
    index: &DayIndex,
    with_diary: &HashSet<NaiveDate>,
    ctx: &TimeContext,
    filter: Option<&str>,
) -> Vec<CalendarCell> {
    grid.iter()
        .map(|day| {
            let attachments = if day.outside_period {
                Attachments::default()
            } else {
                index.attachments_for(&day.date)
            };
            let colors = attachments.mood_colors();

            CalendarCell {
                date: day.date,
                key: day_key(&day.date),
                weekday: day.weekday,
                outside_period: day.outside_period,
                is_today: ctx.is_today(day.date),
                is_future: ctx.is_future(day.date),
                background: project_color(&colors),
                matches_filter: matches_filter(&colors, filter),
                has_diary: !day.outside_period && with_diary.contains(&day.date),
                moods: attachments.moods,
                events: attachments.events,
            }
        })
        .collect()
}

/// Click on a day: decide how the color filter changes.
pub async fn select_day(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SelectDayRequest>,
) -> AppResult<Json<SelectDayResponse>> {
    let colors = match days::fetch_day_record(&state.db, auth_user.id, body.date).await? {
        Some(record) => record.mood_colors(),
        None => Vec::new(),
    };

    Ok(Json(select(body, &colors)))
}

fn select(body: SelectDayRequest, colors: &[String]) -> SelectDayResponse {
    let active = body.active_filter.as_deref().filter(|f| !f.is_empty());
    let outcome = resolve_click(colors, active);

    SelectDayResponse {
        selected_date: body.date,
        filter: outcome.apply(active),
        warning: outcome.warning(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::attachments::fixtures::*;
    use crate::calendar::FilterOutcome;
    use chrono::{TimeZone, Utc};

    fn ctx_on(date: NaiveDate) -> TimeContext {
        let now = Utc
            .from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap());
        TimeContext::new(chrono_tz::UTC, now)
    }

    #[test]
    fn test_build_cells_for_month() {
        let happy = mood("Happy", "#ff0000");
        let sad = mood("Sad", "#0000ff");
        let records = vec![
            record(date(2024, 5, 1), &[&happy], &[]),
            record(date(2024, 5, 2), &[&happy, &sad], &[]),
            // Padding date in April: must not show up in the May grid
            record(date(2024, 4, 30), &[&sad], &[]),
        ];
        let index = DayIndex::build(&records);
        let diary: HashSet<NaiveDate> = [date(2024, 5, 2), date(2024, 4, 29)].into_iter().collect();
        let grid = expand_range(date(2024, 5, 1), Granularity::Month);

        let cells = build_cells(&grid, &index, &diary, &ctx_on(date(2024, 5, 2)), None);
        assert_eq!(cells.len(), 33);

        let padding = &cells[1];
        assert!(padding.outside_period);
        assert!(padding.moods.is_empty());
        assert_eq!(padding.background.css(), "transparent");
        assert!(!cells[0].has_diary);

        let first = &cells[2];
        assert_eq!(first.key, "2024-05-01");
        assert_eq!(first.background.css(), "#ff0000");

        let second = &cells[3];
        assert!(second.is_today);
        assert!(second.has_diary);
        assert_eq!(
            second.background.css(),
            "linear-gradient(to right, #ff0000 0%, #ff0000 50%, #0000ff 50%, #0000ff 100%)"
        );
        assert!(cells[4].is_future);
    }

    #[test]
    fn test_build_cells_applies_filter() {
        let happy = mood("Happy", "#ff0000");
        let sad = mood("Sad", "#0000ff");
        let records = vec![
            record(date(2024, 1, 1), &[&happy], &[]),
            record(date(2024, 1, 2), &[&sad], &[]),
        ];
        let index = DayIndex::build(&records);
        let grid = expand_range(date(2024, 1, 1), Granularity::Month);
        let cells = build_cells(
            &grid,
            &index,
            &HashSet::new(),
            &ctx_on(date(2024, 1, 31)),
            Some("#0000ff"),
        );
        assert!(!cells[0].matches_filter);
        assert!(cells[1].matches_filter);
        assert!(!cells[2].matches_filter);
    }

    #[test]
    fn test_select_single_color_sets_filter() {
        let body = SelectDayRequest {
            date: date(2024, 1, 1),
            active_filter: None,
        };
        let resp = select(body, &["#ff0000".to_string()]);
        assert_eq!(resp.outcome, FilterOutcome::Set("#ff0000".into()));
        assert_eq!(resp.filter.as_deref(), Some("#ff0000"));
        assert!(resp.warning.is_none());
    }

    #[test]
    fn test_select_multi_color_warns_and_keeps_filter() {
        let body = SelectDayRequest {
            date: date(2024, 1, 1),
            active_filter: Some("#00ff00".into()),
        };
        let resp = select(body, &["#ff0000".to_string(), "#0000ff".to_string()]);
        assert_eq!(resp.outcome, FilterOutcome::Ambiguous);
        assert_eq!(resp.filter.as_deref(), Some("#00ff00"));
        assert!(resp.warning.is_some());
        assert_eq!(resp.selected_date, date(2024, 1, 1));
    }

    #[test]
    fn test_select_empty_filter_string_is_no_filter() {
        let body = SelectDayRequest {
            date: date(2024, 1, 1),
            active_filter: Some(String::new()),
        };
        let resp = select(body, &[]);
        assert_eq!(resp.outcome, FilterOutcome::Unchanged);
        assert!(resp.filter.is_none());
    }
}
