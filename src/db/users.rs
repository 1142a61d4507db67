use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::calendar::TimeContext;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::user::User;

/// Resolve the caller's time zone for this request.
pub async fn time_context(pool: &PgPool, user_id: Uuid, config: &Config) -> AppResult<TimeContext> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, timezone, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let now = Utc::now();
    Ok(match user {
        Some(user) => TimeContext::from_user_timezone(&user.timezone, config.default_timezone, now),
        None => {
            tracing::debug!(user_id = %user_id, "No user profile, using default timezone");
            TimeContext::new(config.default_timezone, now)
        }
    })
}
