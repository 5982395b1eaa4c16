//! Workspace operations: creation, follow, invitations, membership,
//! archive, visibility, stats and tags

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{CollabError, CollabResult};
use crate::models::follower::{FollowTarget, Follower};
use crate::models::member::{InvitationAction, MemberRole, MemberStatus, WorkspaceMember};
use crate::models::note::Note;
use crate::models::tag::Tag;
use crate::models::user::User;
use crate::models::workspace::{CreateWorkspace, Visibility, Workspace};

const WORKSPACE_NOT_FOUND: &str = "Workspace not found";

/// Aggregated counters for one workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStats {
    pub follower_count: i32,

    /// Members whose status is `active`
    pub member_count: i64,
    pub visibility: Visibility,
}

pub async fn get_workspace(pool: &PgPool, workspace_id: Uuid) -> CollabResult<Workspace> {
    Workspace::find_by_id(pool, workspace_id)
        .await?
        .ok_or_else(|| CollabError::not_found(WORKSPACE_NOT_FOUND))
}

async fn owned_workspace(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
    forbidden: &str,
) -> CollabResult<Workspace> {
    let workspace = get_workspace(pool, workspace_id).await?;

    if !workspace.is_owned_by(user_id) {
        return Err(CollabError::forbidden(forbidden));
    }

    Ok(workspace)
}

/// Fails unless the user owns the workspace or is an active member
pub(crate) async fn ensure_workspace_access(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
) -> CollabResult<()> {
    let workspace = get_workspace(pool, workspace_id).await?;

    if workspace.is_owned_by(user_id) {
        return Ok(());
    }

    match WorkspaceMember::find(pool, workspace_id, user_id).await? {
        Some(member) if member.status == MemberStatus::Active => Ok(()),
        _ => Err(CollabError::forbidden("Not a member of this workspace")),
    }
}

/// Creates a workspace and moves the listed notes into it
///
/// Only notes the creator owns are moved; other IDs are ignored. Both steps
/// commit together.
pub async fn create_workspace(
    pool: &PgPool,
    data: CreateWorkspace,
    note_ids: &[Uuid],
) -> CollabResult<Workspace> {
    let owner = data.created_by;
    let mut tx = pool.begin().await?;

    let workspace = Workspace::create(&mut *tx, data)
        .await
        .map_err(CollabError::unknown_caller)?;

    if !note_ids.is_empty() {
        let moved = Note::move_to_workspace(&mut *tx, owner, note_ids, workspace.id).await?;
        debug!(workspace_id = %workspace.id, moved, "Notes moved into workspace");
    }

    tx.commit().await?;

    info!(workspace_id = %workspace.id, created_by = %owner, "Workspace created");
    Ok(workspace)
}

pub async fn list_workspaces(pool: &PgPool, user_id: Uuid) -> CollabResult<Vec<Workspace>> {
    Ok(Workspace::list_for_user(pool, user_id).await?)
}

/// Follows a public workspace
pub async fn follow_workspace(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
) -> CollabResult<Follower> {
    let mut tx = pool.begin().await?;

    let workspace = Workspace::find_by_id(&mut *tx, workspace_id)
        .await?
        .ok_or_else(|| CollabError::not_found(WORKSPACE_NOT_FOUND))?;

    if !workspace.visibility.is_public() {
        return Err(CollabError::forbidden("Can only follow public workspaces"));
    }

    let follower = Follower::insert(&mut *tx, FollowTarget::Workspace, workspace_id, user_id)
        .await
        .map_err(|e| CollabError::caller_insert(e, "Already following"))?;

    Follower::adjust_follower_count(&mut *tx, FollowTarget::Workspace, workspace_id, 1).await?;
    tx.commit().await?;

    info!(workspace_id = %workspace_id, user_id = %user_id, "Workspace followed");
    Ok(follower)
}

pub async fn unfollow_workspace(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
) -> CollabResult<()> {
    let mut tx = pool.begin().await?;

    if !Follower::delete(&mut *tx, FollowTarget::Workspace, workspace_id, user_id).await? {
        return Err(CollabError::not_found("Not following"));
    }

    Follower::adjust_follower_count(&mut *tx, FollowTarget::Workspace, workspace_id, -1).await?;
    tx.commit().await?;

    info!(workspace_id = %workspace_id, user_id = %user_id, "Workspace unfollowed");
    Ok(())
}

pub async fn list_workspace_followers(
    pool: &PgPool,
    workspace_id: Uuid,
    limit: i64,
    offset: i64,
) -> CollabResult<Vec<Follower>> {
    Ok(Follower::list(pool, FollowTarget::Workspace, workspace_id, limit, offset).await?)
}

/// Invites users to a workspace as a single all-or-nothing batch
///
/// Returns the number of invitations created.
///
/// # Errors
///
/// - `NotFound` if the workspace or any invitee doesn't exist
/// - `Forbidden` if `inviter_id` doesn't own the workspace
/// - `Conflict` if any invitee already has a membership row, or is listed
///   twice; nothing is inserted in that case
pub async fn invite(
    pool: &PgPool,
    workspace_id: Uuid,
    inviter_id: Uuid,
    user_ids: &[Uuid],
    role: MemberRole,
) -> CollabResult<u64> {
    owned_workspace(pool, workspace_id, inviter_id, "Only workspace owner can invite").await?;

    if User::count_existing(pool, user_ids).await? < distinct_count(user_ids) {
        return Err(CollabError::not_found("User not found"));
    }

    let invited = WorkspaceMember::invite_many(pool, workspace_id, inviter_id, user_ids, role)
        .await
        .map_err(|e| CollabError::conflict_on_duplicate(e, "User already invited or a member"))?;

    info!(
        workspace_id = %workspace_id,
        inviter_id = %inviter_id,
        invited,
        role = role.as_str(),
        "Users invited to workspace"
    );

    Ok(invited)
}

fn distinct_count(ids: &[Uuid]) -> i64 {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.len() as i64
}

/// Accepts or declines the caller's pending invitation
pub async fn respond_to_invitation(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
    action: InvitationAction,
) -> CollabResult<MemberStatus> {
    let member = WorkspaceMember::respond(pool, workspace_id, user_id, action)
        .await?
        .ok_or_else(|| CollabError::not_found("Invitation not found"))?;

    info!(
        workspace_id = %workspace_id,
        user_id = %user_id,
        status = member.status.as_str(),
        "Invitation answered"
    );

    Ok(member.status)
}

pub async fn list_members(pool: &PgPool, workspace_id: Uuid) -> CollabResult<Vec<WorkspaceMember>> {
    get_workspace(pool, workspace_id).await?;
    Ok(WorkspaceMember::list_by_workspace(pool, workspace_id).await?)
}

pub async fn remove_member(
    pool: &PgPool,
    workspace_id: Uuid,
    owner_id: Uuid,
    member_id: Uuid,
) -> CollabResult<()> {
    owned_workspace(pool, workspace_id, owner_id, "Only workspace owner can remove members").await?;

    if !WorkspaceMember::remove(pool, workspace_id, member_id).await? {
        return Err(CollabError::not_found("Member not found"));
    }

    info!(workspace_id = %workspace_id, member_id = %member_id, "Member removed");
    Ok(())
}

pub async fn set_workspace_archived(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
    archived: bool,
) -> CollabResult<()> {
    owned_workspace(pool, workspace_id, user_id, "Only owner can archive workspace").await?;

    if !Workspace::set_archived(pool, workspace_id, archived).await? {
        return Err(CollabError::not_found(WORKSPACE_NOT_FOUND));
    }

    info!(workspace_id = %workspace_id, archived, "Workspace archive state changed");
    Ok(())
}

pub async fn set_workspace_visibility(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
    visibility: Visibility,
) -> CollabResult<()> {
    owned_workspace(
        pool,
        workspace_id,
        user_id,
        "Only owner can change workspace visibility",
    )
    .await?;

    if !Workspace::set_visibility(pool, workspace_id, visibility).await? {
        return Err(CollabError::not_found(WORKSPACE_NOT_FOUND));
    }

    info!(
        workspace_id = %workspace_id,
        visibility = visibility.as_str(),
        "Workspace visibility changed"
    );
    Ok(())
}

pub async fn workspace_stats(pool: &PgPool, workspace_id: Uuid) -> CollabResult<WorkspaceStats> {
    let workspace = get_workspace(pool, workspace_id).await?;
    let member_count = WorkspaceMember::count_active(pool, workspace_id).await?;

    Ok(WorkspaceStats {
        follower_count: workspace.follower_count,
        member_count,
        visibility: workspace.visibility,
    })
}

pub async fn create_tag(
    pool: &PgPool,
    workspace_id: Uuid,
    user_id: Uuid,
    name: &str,
) -> CollabResult<Tag> {
    owned_workspace(pool, workspace_id, user_id, "Only workspace owner can create tags").await?;

    let tag = Tag::create(pool, workspace_id, name)
        .await
        .map_err(|e| CollabError::conflict_on_duplicate(e, "Tag already exists"))?;

    debug!(workspace_id = %workspace_id, tag_id = %tag.id, "Tag created");
    Ok(tag)
}

pub async fn list_tags(pool: &PgPool, workspace_id: Uuid) -> CollabResult<Vec<Tag>> {
    get_workspace(pool, workspace_id).await?;
    Ok(Tag::list_by_workspace(pool, workspace_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_count_ignores_repeats() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(distinct_count(&[]), 0);
        assert_eq!(distinct_count(&[a, b]), 2);
        assert_eq!(distinct_count(&[a, b, a]), 2);
    }
}
