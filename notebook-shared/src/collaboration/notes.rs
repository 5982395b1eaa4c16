//! Note operations: authoring, follow, views, archive, stats and tags

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{CollabError, CollabResult};
use super::workspaces::ensure_workspace_access;
use crate::models::follower::{FollowTarget, Follower};
use crate::models::note::{CreateNote, Note, NoteStatus, UpdateNote};
use crate::models::tag::Tag;
use crate::models::viewer::NoteViewer;

const NOTE_NOT_FOUND: &str = "Note not found";

/// Aggregated counters for one note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStats {
    pub follower_count: i32,
    pub viewer_count: i32,
    pub total_views: i64,
    pub status: NoteStatus,
}

/// Loads a live note or fails with `NotFound`
pub async fn get_note(pool: &PgPool, note_id: Uuid) -> CollabResult<Note> {
    Note::find_by_id(pool, note_id)
        .await?
        .ok_or_else(|| CollabError::not_found(NOTE_NOT_FOUND))
}

/// Loads a note the user owns; `NotFound` before `Forbidden`
async fn owned_note(pool: &PgPool, note_id: Uuid, user_id: Uuid, action: &str) -> CollabResult<Note> {
    let note = get_note(pool, note_id).await?;

    if !note.is_owned_by(user_id) {
        return Err(CollabError::forbidden(format!("Only owner can {} note", action)));
    }

    Ok(note)
}

/// Creates a note authored by `data.created_by`
///
/// When a workspace is given the author must own it or be an active member.
pub async fn create_note(pool: &PgPool, data: CreateNote) -> CollabResult<Note> {
    if let Some(workspace_id) = data.workspace_id {
        ensure_workspace_access(pool, workspace_id, data.created_by).await?;
    }

    let note = Note::create(pool, data)
        .await
        .map_err(CollabError::unknown_caller)?;
    info!(note_id = %note.id, created_by = %note.created_by, "Note created");

    Ok(note)
}

pub async fn update_note(
    pool: &PgPool,
    note_id: Uuid,
    user_id: Uuid,
    data: UpdateNote,
) -> CollabResult<Note> {
    owned_note(pool, note_id, user_id, "edit").await?;

    let note = Note::update(pool, note_id, user_id, data)
        .await?
        .ok_or_else(|| CollabError::not_found(NOTE_NOT_FOUND))?;

    debug!(note_id = %note_id, "Note updated");
    Ok(note)
}

/// Soft-deletes a note the user owns
pub async fn delete_note(pool: &PgPool, note_id: Uuid, user_id: Uuid) -> CollabResult<()> {
    owned_note(pool, note_id, user_id, "delete").await?;

    if !Note::soft_delete(pool, note_id).await? {
        return Err(CollabError::not_found(NOTE_NOT_FOUND));
    }

    info!(note_id = %note_id, "Note deleted");
    Ok(())
}

/// Follows a public note
///
/// The follower row and the counter increment commit together. A duplicate
/// follow, including one lost to a concurrent request, is a `Conflict` and
/// leaves the counter untouched.
pub async fn follow_note(pool: &PgPool, note_id: Uuid, user_id: Uuid) -> CollabResult<Follower> {
    let mut tx = pool.begin().await?;

    let note = Note::find_by_id(&mut *tx, note_id)
        .await?
        .ok_or_else(|| CollabError::not_found(NOTE_NOT_FOUND))?;

    if !note.status.is_public() {
        return Err(CollabError::forbidden("Can only follow public notes"));
    }

    let follower = Follower::insert(&mut *tx, FollowTarget::Note, note_id, user_id)
        .await
        .map_err(|e| CollabError::caller_insert(e, "Already following"))?;

    Follower::adjust_follower_count(&mut *tx, FollowTarget::Note, note_id, 1).await?;
    tx.commit().await?;

    info!(note_id = %note_id, user_id = %user_id, "Note followed");
    Ok(follower)
}

/// Removes a follow; `NotFound` when the user wasn't following
pub async fn unfollow_note(pool: &PgPool, note_id: Uuid, user_id: Uuid) -> CollabResult<()> {
    let mut tx = pool.begin().await?;

    if !Follower::delete(&mut *tx, FollowTarget::Note, note_id, user_id).await? {
        return Err(CollabError::not_found("Not following"));
    }

    Follower::adjust_follower_count(&mut *tx, FollowTarget::Note, note_id, -1).await?;
    tx.commit().await?;

    info!(note_id = %note_id, user_id = %user_id, "Note unfollowed");
    Ok(())
}

pub async fn list_note_followers(
    pool: &PgPool,
    note_id: Uuid,
    limit: i64,
    offset: i64,
) -> CollabResult<Vec<Follower>> {
    Ok(Follower::list(pool, FollowTarget::Note, note_id, limit, offset).await?)
}

/// Records one view of a note by a user
///
/// Works on notes of any status. Returns `true` on the user's first view.
/// A user id with no user row is `Unauthenticated`.
pub async fn record_view(pool: &PgPool, note_id: Uuid, user_id: Uuid) -> CollabResult<bool> {
    let mut tx = pool.begin().await?;

    if Note::find_by_id(&mut *tx, note_id).await?.is_none() {
        return Err(CollabError::not_found(NOTE_NOT_FOUND));
    }

    let first_view = NoteViewer::record(&mut *tx, note_id, user_id)
        .await
        .map_err(CollabError::unknown_caller)?;
    if first_view {
        Note::adjust_viewer_count(&mut *tx, note_id, 1).await?;
    }

    tx.commit().await?;

    debug!(note_id = %note_id, user_id = %user_id, first_view, "Note view recorded");
    Ok(first_view)
}

pub async fn list_note_viewers(
    pool: &PgPool,
    note_id: Uuid,
    limit: i64,
) -> CollabResult<Vec<NoteViewer>> {
    Ok(NoteViewer::list_recent(pool, note_id, limit).await?)
}

pub async fn note_stats(pool: &PgPool, note_id: Uuid) -> CollabResult<NoteStats> {
    let note = get_note(pool, note_id).await?;
    let total_views = NoteViewer::total_views(pool, note_id).await?;

    Ok(NoteStats {
        follower_count: note.follower_count,
        viewer_count: note.viewer_count,
        total_views,
        status: note.status,
    })
}

/// Archives or unarchives a note the user owns; repeating a call is harmless
pub async fn set_note_archived(
    pool: &PgPool,
    note_id: Uuid,
    user_id: Uuid,
    archived: bool,
) -> CollabResult<()> {
    owned_note(pool, note_id, user_id, "archive").await?;

    if !Note::set_archived(pool, note_id, archived).await? {
        return Err(CollabError::not_found(NOTE_NOT_FOUND));
    }

    info!(note_id = %note_id, archived, "Note archive state changed");
    Ok(())
}

/// Attaches a tag from the note's own workspace
pub async fn attach_tag(
    pool: &PgPool,
    note_id: Uuid,
    tag_id: Uuid,
    user_id: Uuid,
) -> CollabResult<()> {
    let note = owned_note(pool, note_id, user_id, "tag").await?;

    let tag = Tag::find_by_id(pool, tag_id)
        .await?
        .ok_or_else(|| CollabError::not_found("Tag not found"))?;

    if note.workspace_id != Some(tag.workspace_id) {
        return Err(CollabError::Invalid(
            "Tag belongs to a different workspace".to_string(),
        ));
    }

    Tag::attach(pool, note_id, tag_id)
        .await
        .map_err(|e| CollabError::conflict_on_duplicate(e, "Tag already attached"))?;

    debug!(note_id = %note_id, tag_id = %tag_id, "Tag attached");
    Ok(())
}

pub async fn detach_tag(
    pool: &PgPool,
    note_id: Uuid,
    tag_id: Uuid,
    user_id: Uuid,
) -> CollabResult<()> {
    owned_note(pool, note_id, user_id, "tag").await?;

    if !Tag::detach(pool, note_id, tag_id).await? {
        return Err(CollabError::not_found("Tag not attached"));
    }

    Ok(())
}

pub async fn list_note_tags(pool: &PgPool, note_id: Uuid) -> CollabResult<Vec<Tag>> {
    get_note(pool, note_id).await?;
    Ok(Tag::list_for_note(pool, note_id).await?)
}
