/// Workspace model and database operations
///
/// A workspace groups notes and members. Its `follower_count` is a cached
/// count of `workspace_followers` rows, maintained by the collaboration
/// service with relative updates.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE workspace_visibility AS ENUM ('public', 'private');
///
/// CREATE TABLE workspaces (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     description TEXT,
///     visibility workspace_visibility NOT NULL DEFAULT 'private',
///     archived BOOLEAN NOT NULL DEFAULT FALSE,
///     archived_at TIMESTAMPTZ,
///     follower_count INTEGER NOT NULL DEFAULT 0,
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

const WORKSPACE_COLUMNS: &str =
    "id, name, description, visibility, archived, archived_at, follower_count, created_by, created_at";

/// Workspace visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workspace_visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anyone can see and follow
    Public,

    /// Owner and members only
    #[default]
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Workspace row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub archived: bool,
    pub archived_at: Option<DateTime<Utc>>,

    /// Cached number of `workspace_followers` rows
    pub follower_count: i32,

    /// Owner; the only user allowed to invite, archive or change visibility
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }
}

/// Input for creating a workspace
#[derive(Debug, Clone)]
pub struct CreateWorkspace {
    pub name: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub created_by: Uuid,
}

impl Workspace {
    pub async fn create<'e, E>(executor: E, data: CreateWorkspace) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            INSERT INTO workspaces (name, description, visibility, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {WORKSPACE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Workspace>(&sql)
            .bind(data.name)
            .bind(data.description)
            .bind(data.visibility)
            .bind(data.created_by)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE id = $1");

        sqlx::query_as::<_, Workspace>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lists workspaces the user created or is an active member of
    pub async fn list_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            SELECT {WORKSPACE_COLUMNS} FROM workspaces
            WHERE created_by = $1
               OR id IN (
                   SELECT workspace_id FROM workspace_members
                   WHERE user_id = $1 AND status = 'active'
               )
            ORDER BY created_at DESC
            "#
        );

        sqlx::query_as::<_, Workspace>(&sql)
            .bind(user_id)
            .fetch_all(executor)
            .await
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
            UPDATE workspaces
            SET archived = $2,
                archived_at = CASE WHEN $2 THEN NOW() ELSE NULL END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(archived)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_visibility<'e, E>(
        executor: E,
        id: Uuid,
        visibility: Visibility,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE workspaces SET visibility = $2 WHERE id = $1")
            .bind(id)
            .bind(visibility)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_as_str() {
        assert_eq!(Visibility::Public.as_str(), "public");
        assert_eq!(Visibility::Private.as_str(), "private");
    }

    #[test]
    fn test_default_visibility_is_private() {
        assert_eq!(Visibility::default(), Visibility::Private);
        assert!(!Visibility::default().is_public());
    }

    #[test]
    fn test_ownership() {
        let owner = Uuid::new_v4();
        let workspace = Workspace {
            id: Uuid::new_v4(),
            name: "Biology".to_string(),
            description: None,
            visibility: Visibility::Public,
            archived: false,
            archived_at: None,
            follower_count: 0,
            created_by: owner,
            created_at: Utc::now(),
        };

        assert!(workspace.is_owned_by(owner));
        assert!(!workspace.is_owned_by(Uuid::new_v4()));
    }
}
