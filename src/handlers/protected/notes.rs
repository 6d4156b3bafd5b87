// Note CRUD handlers. All operations run against the authenticated owner;
// cross-owner ids surface as NotFound in the service layer.

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::note::validate_title;
use crate::database::models::Note;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::CurrentUser;
use crate::services::note_service::{NoteChanges, NoteService};

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: Option<String>,
}

impl CreateNoteRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title).map_err(|e| ApiError::validation(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNoteRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            validate_title(title).map_err(|e| ApiError::validation(e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

fn parse_note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::validation("Invalid note ID"))
}

/// GET /api/notes - all live notes for the owner, most recent first
pub async fn notes_get(Extension(user): Extension<CurrentUser>) -> ApiResult<Vec<Note>> {
    let service = NoteService::new().await?;
    let notes = service.list(user.id).await?;
    let count = notes.len();

    Ok(ApiResponse::success(notes).with_count(count))
}

/// GET /api/notes/search?q=... - substring search over title and content
pub async fn notes_search(
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Note>> {
    let query = params.q.unwrap_or_default();

    let service = NoteService::new().await?;
    let notes = service.search(user.id, &query).await?;
    let count = notes.len();

    Ok(ApiResponse::success(notes).with_count(count))
}

/// GET /api/notes/:id
pub async fn note_get(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Note> {
    let note_id = parse_note_id(&id)?;

    let service = NoteService::new().await?;
    let note = service.get_by_id(note_id, user.id).await?;

    Ok(ApiResponse::success(note))
}

/// POST /api/notes
pub async fn note_post(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateNoteRequest>,
) -> ApiResult<Note> {
    payload.validate()?;

    let service = NoteService::new().await?;
    let note = service
        .create(user.id, &payload.title, payload.content)
        .await?;

    Ok(ApiResponse::created(note).with_message("Note created successfully"))
}

/// PUT /api/notes/:id - partial update
pub async fn note_put(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateNoteRequest>,
) -> ApiResult<Note> {
    let note_id = parse_note_id(&id)?;
    payload.validate()?;

    let service = NoteService::new().await?;
    let note = service
        .update(
            note_id,
            user.id,
            NoteChanges {
                title: payload.title,
                content: payload.content,
            },
        )
        .await?;

    Ok(ApiResponse::success(note).with_message("Note updated successfully"))
}

/// DELETE /api/notes/:id - soft delete
pub async fn note_delete(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let note_id = parse_note_id(&id)?;

    let service = NoteService::new().await?;
    service.delete(note_id, user.id).await?;

    Ok(ApiResponse::message_only("Note deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_ids_must_be_uuids() {
        assert!(parse_note_id("not-a-uuid").is_err());
        assert!(parse_note_id("123").is_err());
        assert!(parse_note_id("6dab2d46-9f7c-4b2a-9c9d-0f3b9a2f1a11").is_ok());
    }

    #[test]
    fn create_request_requires_title() {
        let request = CreateNoteRequest {
            title: "  ".to_string(),
            content: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_allows_absent_title() {
        let request = UpdateNoteRequest {
            title: None,
            content: Some("C".to_string()),
        };
        assert!(request.validate().is_ok());

        let request = UpdateNoteRequest {
            title: Some(String::new()),
            content: None,
        };
        assert!(request.validate().is_err());
    }
}
