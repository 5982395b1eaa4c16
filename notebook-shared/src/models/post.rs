/// Post model and database operations
///
/// Posts stand apart from the collaboration data: no owner, integer IDs,
/// hard deletes.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE posts (
///     id SERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// A post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,

    /// Bumped on every update
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
}

/// Input for updating a post; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Post {
    pub async fn create<'e, E>(executor: E, data: CreatePost) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content)
            VALUES ($1, $2)
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Post>(
            "SELECT id, title, content, created_at, updated_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists every post, newest first
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Applies the given fields and bumps `updated_at`
    ///
    /// Returns `None` if no post has this ID.
    pub async fn update<'e, E>(executor: E, id: i32, data: UpdatePost) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.content)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a post, returning whether it existed
    pub async fn delete<'e, E>(executor: E, id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
