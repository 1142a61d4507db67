use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Rich-text diary content for one (user, date). `content` is the editor's
/// document tree, stored as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// PUT /api/diary
#[derive(Debug, Deserialize)]
pub struct UpsertDiaryRequest {
    pub date: NaiveDate,
    pub content: serde_json::Value,
}

impl UpsertDiaryRequest {
    /// The document must be a tree with a root node object.
    pub fn validate_content(&self) -> AppResult<()> {
        match &self.content {
            serde_json::Value::Object(root) if root.contains_key("type") => Ok(()),
            serde_json::Value::Object(_) => Err(AppError::Validation(
                "Diary content root must have a \"type\"".into(),
            )),
            _ => Err(AppError::Validation(
                "Diary content must be a document object".into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: serde_json::Value) -> UpsertDiaryRequest {
        UpsertDiaryRequest {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            content,
        }
    }

    #[test]
    fn test_document_tree_is_accepted() {
        let req = request(serde_json::json!({
            "type": "doc",
            "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "hi" }] }]
        }));
        assert!(req.validate_content().is_ok());
    }

    #[test]
    fn test_non_document_is_rejected() {
        assert!(request(serde_json::json!("plain text")).validate_content().is_err());
        assert!(request(serde_json::json!({ "content": [] })).validate_content().is_err());
    }
}
