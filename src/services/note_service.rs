use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::note::validate_title;
use crate::database::models::{Note, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    // Covers missing, foreign-owned and soft-deleted notes alike; callers
    // cannot tell which, so note existence never leaks across owners
    #[error("Note not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ValidationError> for NoteError {
    fn from(err: ValidationError) -> Self {
        NoteError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for NoteError {
    fn from(err: sqlx::Error) -> Self {
        NoteError::Database(DatabaseError::Sqlx(err))
    }
}

/// Fields a note update may change; absent fields are left untouched
#[derive(Debug, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Owner-scoped note operations. Every query filters by the owning user id
/// and the soft-delete flag.
pub struct NoteService {
    pool: PgPool,
}

impl NoteService {
    pub async fn new() -> Result<Self, NoteError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All live notes for the owner, most recently updated first
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Note>, NoteError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE user_id = $1 AND is_deleted = FALSE ORDER BY updated_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        tracing::info!("Retrieved {} notes for user: {}", notes.len(), owner);
        Ok(notes)
    }

    pub async fn get_by_id(&self, note_id: Uuid, owner: Uuid) -> Result<Note, NoteError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE",
        )
        .bind(note_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        note.ok_or(NoteError::NotFound)
    }

    pub async fn create(
        &self,
        owner: Uuid,
        title: &str,
        content: Option<String>,
    ) -> Result<Note, NoteError> {
        let note = Note::create(owner, title, content)?;

        sqlx::query(
            "INSERT INTO notes (id, user_id, title, content, is_deleted, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.is_deleted)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!("Note created: {} by user: {}", note.id, owner);
        Ok(note)
    }

    /// Apply a partial update; last write wins on concurrent updates
    pub async fn update(
        &self,
        note_id: Uuid,
        owner: Uuid,
        changes: NoteChanges,
    ) -> Result<Note, NoteError> {
        let mut note = self.get_by_id(note_id, owner).await?;

        if let Some(title) = &changes.title {
            note.title = validate_title(title)?;
        }
        if let Some(content) = changes.content {
            note.content = content;
        }
        note.updated_at = chrono::Utc::now();

        sqlx::query(
            "UPDATE notes SET title = $1, content = $2, updated_at = $3 \
             WHERE id = $4 AND user_id = $5 AND is_deleted = FALSE",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.updated_at)
        .bind(note.id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        tracing::info!("Note updated: {} by user: {}", note.id, owner);
        Ok(note)
    }

    /// Soft delete. A second delete of the same note reports NotFound because
    /// the flag already hides it.
    pub async fn delete(&self, note_id: Uuid, owner: Uuid) -> Result<(), NoteError> {
        let result = sqlx::query(
            "UPDATE notes SET is_deleted = TRUE, updated_at = now() \
             WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE",
        )
        .bind(note_id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(NoteError::NotFound);
        }

        tracing::info!("Note deleted: {} by user: {}", note_id, owner);
        Ok(())
    }

    /// Case-insensitive substring match over title or content
    pub async fn search(&self, owner: Uuid, query: &str) -> Result<Vec<Note>, NoteError> {
        let pattern = like_pattern(query);

        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE user_id = $1 AND is_deleted = FALSE \
             AND (title ILIKE $2 OR content ILIKE $2) ORDER BY updated_at DESC",
        )
        .bind(owner)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        tracing::info!(
            "Search for {:?} returned {} notes for user: {}",
            query,
            notes.len(),
            owner
        );
        Ok(notes)
    }
}

/// Wrap a raw query in ILIKE wildcards, escaping pattern metacharacters so
/// user input always matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_in_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
