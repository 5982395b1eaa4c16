/// Follow relations for notes and workspaces
///
/// Note and workspace followers live in two tables with the same shape, so
/// one set of queries serves both, keyed by [`FollowTarget`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE note_followers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     note_id UUID NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
///     followed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX note_follower_unique ON note_followers(user_id, note_id);
/// ```
///
/// `workspace_followers` is identical with `workspace_id` in place of
/// `note_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Kind of entity being followed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowTarget {
    Note,
    Workspace,
}

impl FollowTarget {
    /// Follower table
    pub fn table(&self) -> &'static str {
        match self {
            FollowTarget::Note => "note_followers",
            FollowTarget::Workspace => "workspace_followers",
        }
    }

    /// Foreign key column pointing at the followed entity
    pub fn column(&self) -> &'static str {
        match self {
            FollowTarget::Note => "note_id",
            FollowTarget::Workspace => "workspace_id",
        }
    }

    /// Table holding the cached `follower_count`
    pub fn entity_table(&self) -> &'static str {
        match self {
            FollowTarget::Note => "notes",
            FollowTarget::Workspace => "workspaces",
        }
    }
}

/// Follower entry as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Follower {
    pub user_id: Uuid,
    pub followed_at: DateTime<Utc>,
}

impl Follower {
    /// Inserts a follower row
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the user already follows the entity.
    pub async fn insert<'e, E>(
        executor: E,
        target: FollowTarget,
        entity_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "INSERT INTO {} (user_id, {}) VALUES ($1, $2) RETURNING user_id, followed_at",
            target.table(),
            target.column()
        );

        sqlx::query_as::<_, Follower>(&sql)
            .bind(user_id)
            .bind(entity_id)
            .fetch_one(executor)
            .await
    }

    /// Deletes a follower row, returning whether one existed
    pub async fn delete<'e, E>(
        executor: E,
        target: FollowTarget,
        entity_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND {} = $2",
            target.table(),
            target.column()
        );

        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(entity_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists followers, oldest first
    pub async fn list<'e, E>(
        executor: E,
        target: FollowTarget,
        entity_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            SELECT user_id, followed_at FROM {}
            WHERE {} = $1
            ORDER BY followed_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
            target.table(),
            target.column()
        );

        sqlx::query_as::<_, Follower>(&sql)
            .bind(entity_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Adds `delta` to the entity's cached follower count
    pub async fn adjust_follower_count<'e, E>(
        executor: E,
        target: FollowTarget,
        entity_id: Uuid,
        delta: i32,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "UPDATE {} SET follower_count = follower_count + $2 WHERE id = $1",
            target.entity_table()
        );

        sqlx::query(&sql)
            .bind(entity_id)
            .bind(delta)
            .execute(executor)
            .await?;

        Ok(())
    }
}
