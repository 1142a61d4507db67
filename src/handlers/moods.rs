use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db::days::prune_empty_days;
use crate::dto::DeleteResponse;
use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::models::mood::{CreateMoodRequest, MoodResponse, MoodRow, UpdateMoodRequest};
use crate::AppState;

const MOOD_COLUMNS: &str = "id, name, color, created_at, updated_at";

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<MoodResponse>>> {
    let rows = sqlx::query_as::<_, MoodRow>(&format!(
        "SELECT {MOOD_COLUMNS} FROM moods WHERE user_id = $1 ORDER BY created_at ASC, name ASC"
    ))
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(MoodResponse::from).collect()))
}

pub async fn get_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<MoodResponse>> {
    let row = sqlx::query_as::<_, MoodRow>(&format!(
        "SELECT {MOOD_COLUMNS} FROM moods WHERE id = $1 AND user_id = $2"
    ))
    .bind(mood_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Mood not found".into()))?;

    Ok(Json(row.into()))
}

pub async fn create_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateMoodRequest>,
) -> AppResult<Json<MoodResponse>> {
    body.validate()?;

    let row = sqlx::query_as::<_, MoodRow>(&format!(
        "INSERT INTO moods (id, user_id, name, color)
         VALUES ($1, $2, $3, $4)
         RETURNING {MOOD_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.name.trim())
    .bind(body.color.encode())
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "A mood with this name already exists"))?;

    tracing::info!(user_id = %auth_user.id, mood_id = %row.id, "Mood created");
    Ok(Json(row.into()))
}

pub async fn update_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
    Json(body): Json<UpdateMoodRequest>,
) -> AppResult<Json<MoodResponse>> {
    body.validate()?;

    let row = sqlx::query_as::<_, MoodRow>(&format!(
        "UPDATE moods SET
            name = COALESCE($3, name),
            color = COALESCE($4, color),
            updated_at = NOW()
         WHERE id = $1 AND user_id = $2
         RETURNING {MOOD_COLUMNS}"
    ))
    .bind(mood_id)
    .bind(auth_user.id)
    .bind(body.name.as_deref().map(str::trim))
    .bind(body.color.as_ref().map(|c| c.encode()))
    .fetch_optional(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "A mood with this name already exists"))?
    .ok_or(AppError::NotFound("Mood not found".into()))?;

    Ok(Json(row.into()))
}

/// Deleting a mood removes it from every day; days left empty are pruned.
pub async fn delete_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let result = sqlx::query("DELETE FROM moods WHERE id = $1 AND user_id = $2")
        .bind(mood_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Mood not found".into()));
    }

    let pruned = prune_empty_days(&state.db, auth_user.id).await?;
    tracing::info!(user_id = %auth_user.id, mood_id = %mood_id, pruned, "Mood deleted");

    Ok(Json(DeleteResponse {
        deleted: true,
        id: mood_id,
    }))
}
