//! User registration and lookup

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::error::{CollabError, CollabResult};
use crate::models::user::{CreateUser, User};

pub async fn create_user(pool: &PgPool, data: CreateUser) -> CollabResult<User> {
    let user = User::create(pool, data)
        .await
        .map_err(|e| CollabError::conflict_on_duplicate(e, "Email already registered"))?;

    info!(user_id = %user.id, "User created");
    Ok(user)
}

pub async fn get_user(pool: &PgPool, user_id: Uuid) -> CollabResult<User> {
    User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| CollabError::not_found("User not found"))
}

/// Deletes the caller's own account
///
/// Follows and views cascade with the user; the cached counters on other
/// users' notes and workspaces drop in the same transaction.
pub async fn delete_user(pool: &PgPool, user_id: Uuid, caller_id: Uuid) -> CollabResult<()> {
    if user_id != caller_id {
        return Err(CollabError::forbidden("Can only delete your own account"));
    }

    if !User::delete(pool, user_id).await? {
        return Err(CollabError::not_found("User not found"));
    }

    info!(user_id = %user_id, "User deleted");
    Ok(())
}
