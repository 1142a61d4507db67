use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::models::diary::{DateRangeQuery, DiaryEntry, UpsertDiaryRequest};
use crate::AppState;

pub async fn upsert_diary_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertDiaryRequest>,
) -> AppResult<Json<DiaryEntry>> {
    body.validate_content()?;

    let entry = sqlx::query_as::<_, DiaryEntry>(
        r#"
        INSERT INTO diary_entries (id, user_id, entry_date, content)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, entry_date) DO UPDATE SET
            content = EXCLUDED.content,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.date)
    .bind(&body.content)
    .fetch_one(&state.db)
    .await?;

    tracing::debug!(user_id = %auth_user.id, date = %body.date, "Diary entry saved");
    Ok(Json(entry))
}

pub async fn get_diary_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<DiaryEntry>> {
    let entry = sqlx::query_as::<_, DiaryEntry>(
        "SELECT * FROM diary_entries WHERE user_id = $1 AND entry_date = $2",
    )
    .bind(auth_user.id)
    .bind(date)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Diary entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn delete_diary_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<serde_json::Value>> {
    // Idempotent: deleting a missing entry still succeeds
    let result = sqlx::query("DELETE FROM diary_entries WHERE user_id = $1 AND entry_date = $2")
        .bind(auth_user.id)
        .bind(date)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({
        "deleted": result.rows_affected() > 0,
        "date": date,
    })))
}

/// Dates in range that have a diary entry. Defaults to the current month.
pub async fn list_diary_dates(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<NaiveDate>>> {
    let ctx = users::time_context(&state.db, auth_user.id, &state.config).await?;
    let start = query
        .start_date
        .or_else(|| ctx.today.with_day(1))
        .unwrap_or(ctx.today);
    let end = query.end_date.unwrap_or(ctx.today);

    Ok(Json(diary_dates(&state, auth_user.id, start, end).await?))
}

pub async fn diary_dates(
    state: &AppState,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<NaiveDate>> {
    if start > end {
        return Ok(Vec::new());
    }

    let dates = sqlx::query_scalar::<_, NaiveDate>(
        r#"
        SELECT entry_date FROM diary_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
        ORDER BY entry_date ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.db)
    .await?;

    Ok(dates)
}
