use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "pixels-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Ready once the database answers and the schema is in place.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let schema_ok = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = 'days')",
    )
    .fetch_one(&state.db)
    .await;

    let pool = json!({ "size": state.db.size(), "idle": state.db.num_idle() });

    match schema_ok {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": { "database": "ok", "schema": "ok" },
                "pool": pool,
            })),
        ),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "checks": { "database": "ok", "schema": "missing" },
                "pool": pool,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "checks": { "database": "failed" },
                    "pool": pool,
                })),
            )
        }
    }
}
