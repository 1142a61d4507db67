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
use crate::models::event::{CreateEventRequest, EventRow, UpdateEventRequest};
use crate::AppState;

pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<EventRow>>> {
    let events = sqlx::query_as::<_, EventRow>(
        "SELECT * FROM events WHERE user_id = $1 ORDER BY name ASC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<EventRow>> {
    let event = sqlx::query_as::<_, EventRow>(
        "SELECT * FROM events WHERE id = $1 AND user_id = $2",
    )
    .bind(event_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateEventRequest>,
) -> AppResult<Json<EventRow>> {
    body.validate()?;

    let event = sqlx::query_as::<_, EventRow>(
        r#"
        INSERT INTO events (id, user_id, name)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.name.trim())
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "An event with this name already exists"))?;

    tracing::info!(user_id = %auth_user.id, event_id = %event.id, "Event created");
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> AppResult<Json<EventRow>> {
    body.validate()?;

    let event = sqlx::query_as::<_, EventRow>(
        r#"
        UPDATE events SET name = $3, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(event_id)
    .bind(auth_user.id)
    .bind(body.name.trim())
    .fetch_optional(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "An event with this name already exists"))?
    .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Event not found".into()));
    }

    let pruned = prune_empty_days(&state.db, auth_user.id).await?;
    tracing::info!(user_id = %auth_user.id, event_id = %event_id, pruned, "Event deleted");

    Ok(Json(DeleteResponse {
        deleted: true,
        id: event_id,
    }))
}
