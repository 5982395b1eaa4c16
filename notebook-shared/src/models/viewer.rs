/// Per-user note view tracking
///
/// One row per `(user_id, note_id)`. The first view inserts the row with
/// `view_count = 1`; later views bump `view_count` and `last_viewed_at`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE note_viewers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     note_id UUID NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
///     last_viewed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     view_count INTEGER NOT NULL DEFAULT 1 CHECK (view_count >= 1)
/// );
/// CREATE UNIQUE INDEX note_viewer_unique ON note_viewers(user_id, note_id);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Viewer entry as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteViewer {
    pub user_id: Uuid,
    pub last_viewed_at: DateTime<Utc>,
    pub view_count: i32,
}

impl NoteViewer {
    /// Upserts the viewer row for one view
    ///
    /// Returns `true` when this was the user's first view of the note, which
    /// is when the note's cached `viewer_count` must grow.
    pub async fn record<'e, E>(executor: E, note_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        // xmax is 0 only for a freshly inserted tuple
        sqlx::query_scalar(
            r#"
            INSERT INTO note_viewers (user_id, note_id, last_viewed_at, view_count)
            VALUES ($1, $2, NOW(), 1)
            ON CONFLICT (user_id, note_id) DO UPDATE
            SET view_count = note_viewers.view_count + 1,
                last_viewed_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(user_id)
        .bind(note_id)
        .fetch_one(executor)
        .await
    }

    /// Lists the most recent viewers first
    pub async fn list_recent<'e, E>(
        executor: E,
        note_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, NoteViewer>(
            r#"
            SELECT user_id, last_viewed_at, view_count FROM note_viewers
            WHERE note_id = $1
            ORDER BY last_viewed_at DESC
            LIMIT $2
            "#,
        )
        .bind(note_id)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    /// Sum of `view_count` across every viewer of the note
    pub async fn total_views<'e, E>(executor: E, note_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(view_count), 0)::BIGINT FROM note_viewers WHERE note_id = $1",
        )
        .bind(note_id)
        .fetch_one(executor)
        .await
    }
}
