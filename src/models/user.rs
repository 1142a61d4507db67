use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// IANA timezone identifier, e.g. "Europe/Berlin"
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}
