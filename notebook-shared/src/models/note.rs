/// Note model and database operations
///
/// Notes are authored by one user and optionally attached to a workspace.
/// `follower_count` and `viewer_count` are denormalized caches of the
/// `note_followers` / `note_viewers` rows; they are only ever changed with
/// relative updates in the same transaction as the row insert/delete.
///
/// Deleting a note stamps `deleted_at`. Every query here skips deleted notes,
/// so a deleted note is indistinguishable from a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE note_status AS ENUM ('private', 'public', 'request_access');
///
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     content TEXT NOT NULL,
///     pinned BOOLEAN NOT NULL DEFAULT FALSE,
///     status note_status NOT NULL DEFAULT 'private',
///     follower_count INTEGER NOT NULL DEFAULT 0,
///     viewer_count INTEGER NOT NULL DEFAULT 0,
///     archived BOOLEAN NOT NULL DEFAULT FALSE,
///     archived_at TIMESTAMPTZ,
///     workspace_id UUID REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     updated_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

const NOTE_COLUMNS: &str = "id, title, content, pinned, status, follower_count, viewer_count, \
     archived, archived_at, workspace_id, created_by, updated_by, created_at, updated_at, deleted_at";

/// Who can see a note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "note_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    /// Only the author
    #[default]
    Private,

    /// Anyone; the only status that can be followed
    Public,

    /// Visible on request
    RequestAccess,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Private => "private",
            NoteStatus::Public => "public",
            NoteStatus::RequestAccess => "request_access",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, NoteStatus::Public)
    }
}

/// Note row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub pinned: bool,
    pub status: NoteStatus,

    /// Cached number of `note_followers` rows
    pub follower_count: i32,

    /// Cached number of distinct viewers
    pub viewer_count: i32,

    pub archived: bool,
    pub archived_at: Option<DateTime<Utc>>,

    /// Owning workspace, if any
    pub workspace_id: Option<Uuid>,

    /// Author and owner
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Whether `user_id` owns this note
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }
}

/// Input for creating a note
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    pub status: NoteStatus,
    pub workspace_id: Option<Uuid>,
    pub created_by: Uuid,
}

/// Partial update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<NoteStatus>,
    pub pinned: Option<bool>,
}

impl Note {
    pub async fn create<'e, E>(executor: E, data: CreateNote) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            INSERT INTO notes (title, content, status, workspace_id, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {NOTE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Note>(&sql)
            .bind(data.title)
            .bind(data.content)
            .bind(data.status)
            .bind(data.workspace_id)
            .bind(data.created_by)
            .fetch_one(executor)
            .await
    }

    /// Finds a live (not deleted) note by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND deleted_at IS NULL");

        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lists every live note, newest first
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Note>(&sql).fetch_all(executor).await
    }

    /// Lists recently updated notes, pinned notes first
    pub async fn list_recent<'e, E>(executor: E, limit: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            SELECT {NOTE_COLUMNS} FROM notes
            WHERE deleted_at IS NULL
            ORDER BY pinned DESC, updated_at DESC
            LIMIT $1
            "#
        );

        sqlx::query_as::<_, Note>(&sql)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    /// Finds a user's notes whose title matches exactly, newest first
    pub async fn search_by_title<'e, E>(
        executor: E,
        created_by: Uuid,
        title: &str,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            SELECT {NOTE_COLUMNS} FROM notes
            WHERE deleted_at IS NULL AND created_by = $1 AND title = $2
            ORDER BY created_at DESC
            "#
        );

        sqlx::query_as::<_, Note>(&sql)
            .bind(created_by)
            .bind(title)
            .fetch_all(executor)
            .await
    }

    /// Applies a partial update and stamps `updated_by` / `updated_at`
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        updated_by: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            UPDATE notes
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                status = COALESCE($5, status),
                pinned = COALESCE($6, pinned),
                updated_by = $2,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {NOTE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .bind(updated_by)
            .bind(data.title)
            .bind(data.content)
            .bind(data.status)
            .bind(data.pinned)
            .fetch_optional(executor)
            .await
    }

    /// Soft-deletes a note, returning false if it was already gone
    pub async fn soft_delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE notes SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets the archived flag; `archived_at` is re-stamped on every archive
    pub async fn set_archived<'e, E>(
        executor: E,
        id: Uuid,
        archived: bool,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE notes
            SET archived = $2,
                archived_at = CASE WHEN $2 THEN NOW() ELSE NULL END
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(archived)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Adds `delta` to the cached viewer count
    pub async fn adjust_viewer_count<'e, E>(
        executor: E,
        id: Uuid,
        delta: i32,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE notes SET viewer_count = viewer_count + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Moves the listed notes owned by `owner` into a workspace
    ///
    /// Notes the user doesn't own are silently skipped. Returns the number
    /// of notes moved.
    pub async fn move_to_workspace<'e, E>(
        executor: E,
        owner: Uuid,
        note_ids: &[Uuid],
        workspace_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE notes
            SET workspace_id = $3, updated_at = NOW()
            WHERE created_by = $1 AND id = ANY($2) AND deleted_at IS NULL
            "#,
        )
        .bind(owner)
        .bind(note_ids)
        .bind(workspace_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_status_as_str() {
        assert_eq!(NoteStatus::Private.as_str(), "private");
        assert_eq!(NoteStatus::Public.as_str(), "public");
        assert_eq!(NoteStatus::RequestAccess.as_str(), "request_access");
    }

    #[test]
    fn test_only_public_is_public() {
        assert!(NoteStatus::Public.is_public());
        assert!(!NoteStatus::Private.is_public());
        assert!(!NoteStatus::RequestAccess.is_public());
    }

    #[test]
    fn test_note_status_serde() {
        let status: NoteStatus = serde_json::from_str("\"request_access\"").unwrap();
        assert_eq!(status, NoteStatus::RequestAccess);
        assert_eq!(serde_json::to_string(&NoteStatus::Public).unwrap(), "\"public\"");
        assert!(serde_json::from_str::<NoteStatus>("\"secret\"").is_err());
    }

    #[test]
    fn test_default_status_is_private() {
        assert_eq!(NoteStatus::default(), NoteStatus::Private);
    }
}
