use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::calendar::color::{is_hex_color, ColorError, MoodColor};
use crate::calendar::Mood;

#[derive(Debug, Clone, FromRow)]
pub struct MoodRow {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decode a stored color column once, at the database boundary.
pub fn decode_stored_color(mood_id: Uuid, stored: &str) -> MoodColor {
    match MoodColor::decode(stored) {
        Ok(color) => color,
        Err(e) => {
            let fallback = MoodColor::fallback(stored);
            match e {
                ColorError::Empty => {
                    tracing::warn!(mood_id = %mood_id, "Mood has no color, using unknown sentinel")
                }
                ColorError::Malformed(reason) => tracing::warn!(
                    mood_id = %mood_id,
                    stored = %stored,
                    reason = %reason,
                    "Malformed mood color, displaying raw value"
                ),
            }
            fallback
        }
    }
}

impl MoodRow {
    pub fn into_mood(self) -> Mood {
        Mood {
            id: self.id,
            color: decode_stored_color(self.id, &self.color),
            name: self.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    #[serde(flatten)]
    pub mood: Mood,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MoodRow> for MoodResponse {
    fn from(row: MoodRow) -> Self {
        let (created_at, updated_at) = (row.created_at, row.updated_at);
        Self {
            mood: row.into_mood(),
            created_at,
            updated_at,
        }
    }
}

fn validate_mood_color(color: &MoodColor) -> Result<(), ValidationError> {
    if is_hex_color(&color.value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color must be a 6-digit hex value like #a1b2c3".into());
        Err(err)
    }
}

/// POST /api/moods
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom = "validate_mood_color")]
    pub color: MoodColor,
}

/// PUT /api/moods/:id
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMoodRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(custom = "validate_mood_color")]
    pub color: Option<MoodColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(color: &str) -> MoodRow {
        MoodRow {
            id: Uuid::new_v4(),
            name: "Calm".into(),
            color: color.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_with_json_color() {
        let mood = row(r##"{"name":"Teal","value":"#008080"}"##).into_mood();
        assert_eq!(mood.color, MoodColor::new("Teal", "#008080"));
        assert_eq!(mood.name, "Calm");
    }

    #[test]
    fn test_row_with_legacy_raw_color() {
        let mood = row("#008080").into_mood();
        assert_eq!(mood.color.value, "#008080");
    }

    #[test]
    fn test_row_with_broken_color_degrades() {
        let mood = row(r##"{"value":"#0080"##).into_mood();
        assert_eq!(mood.color.value, r##"{"value":"#0080"##);
        assert_eq!(mood.color.name, "Unknown");
        let mood = row("").into_mood();
        assert_eq!(mood.color, MoodColor::unknown());
    }

    #[test]
    fn test_response_flattens_mood() {
        let json = serde_json::to_value(MoodResponse::from(row("#008080"))).unwrap();
        assert_eq!(json["name"], "Calm");
        assert_eq!(json["color"]["value"], "#008080");
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn test_create_request_validation() {
        let ok: CreateMoodRequest =
            serde_json::from_str(r##"{"name":"Happy","color":{"name":"Red","value":"#ff0000"}}"##)
                .unwrap();
        assert!(ok.validate().is_ok());

        let bad_color: CreateMoodRequest =
            serde_json::from_str(r##"{"name":"Happy","color":{"name":"Red","value":"red"}}"##)
                .unwrap();
        assert!(bad_color.validate().is_err());

        let empty_name: CreateMoodRequest =
            serde_json::from_str(r##"{"name":"","color":{"name":"Red","value":"#ff0000"}}"##)
                .unwrap();
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_update_request_allows_partial() {
        let req: UpdateMoodRequest = serde_json::from_str(r#"{"name":"Calmer"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.color.is_none());
    }
}
