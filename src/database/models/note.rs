use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::ValidationError;

pub const MAX_TITLE_LEN: usize = 255;

/// A note owned by a single user. Soft-deleted rows stay in the table and are
/// filtered out of every query.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Build a new note with a fresh id; title is validated here, content
    /// defaults to empty.
    pub fn create(
        user_id: Uuid,
        title: &str,
        content: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(title)?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content: content.unwrap_or_default(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError(
            "Title cannot exceed 255 characters".to_string(),
        ));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_required() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn title_is_trimmed_and_bounded() {
        assert_eq!(validate_title("  T  ").unwrap(), "T");
        assert!(validate_title(&"x".repeat(255)).is_ok());
        assert!(validate_title(&"x".repeat(256)).is_err());
    }

    #[test]
    fn content_defaults_to_empty() {
        let owner = Uuid::new_v4();
        let note = Note::create(owner, "T", None).unwrap();
        assert_eq!(note.content, "");
        assert!(!note.is_deleted);
        assert_eq!(note.user_id, owner);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let note = Note::create(Uuid::new_v4(), "T", Some("C".to_string())).unwrap();
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("isDeleted").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
