/// Workspace-scoped tags and note attachments
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE
/// );
/// CREATE UNIQUE INDEX tag_workspace_name_unique ON tags(workspace_id, name);
///
/// CREATE TABLE note_tags (
///     note_id UUID NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
///     tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE
/// );
/// CREATE UNIQUE INDEX note_tag_unique ON note_tags(note_id, tag_id);
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub workspace_id: Uuid,
}

impl Tag {
    /// Creates a tag in a workspace
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the workspace already has a tag with
    /// this name.
    pub async fn create<'e, E>(executor: E, workspace_id: Uuid, name: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, workspace_id) VALUES ($1, $2) RETURNING id, name, workspace_id",
        )
        .bind(name)
        .bind(workspace_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>("SELECT id, name, workspace_id FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list_by_workspace<'e, E>(
        executor: E,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>(
            "SELECT id, name, workspace_id FROM tags WHERE workspace_id = $1 ORDER BY name ASC",
        )
        .bind(workspace_id)
        .fetch_all(executor)
        .await
    }

    pub async fn list_for_note<'e, E>(executor: E, note_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.workspace_id
            FROM tags t
            JOIN note_tags nt ON nt.tag_id = t.id
            WHERE nt.note_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(note_id)
        .fetch_all(executor)
        .await
    }

    /// Attaches a tag to a note
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the tag is already attached.
    pub async fn attach<'e, E>(executor: E, note_id: Uuid, tag_id: Uuid) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("INSERT INTO note_tags (note_id, tag_id) VALUES ($1, $2)")
            .bind(note_id)
            .bind(tag_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn detach<'e, E>(executor: E, note_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM note_tags WHERE note_id = $1 AND tag_id = $2")
            .bind(note_id)
            .bind(tag_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
