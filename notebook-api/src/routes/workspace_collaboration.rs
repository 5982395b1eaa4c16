/// Workspace collaboration endpoints
///
/// # Endpoints
///
/// ```text
/// POST   /workspace/:id/follow                  201 {success}          401 403 404 409
/// DELETE /workspace/:id/follow                  200 {success}          401 404
/// GET    /workspace/:id/followers?limit&offset  200 [{userId, followedAt}]
/// POST   /workspace/:id/invite {userIds, role}  201 {success, invited} 401 403 404 409
/// PATCH  /workspace/:id/invitation {action}     200 {success, status}  401 404
/// PATCH  /workspace/:id/archive {archived}      200 {success, archived}
/// PATCH  /workspace/:id/visibility {visibility} 200 {success, visibility}
/// GET    /workspace/:id/stats                   200 {followerCount, memberCount, visibility}
/// GET    /workspace/:id/members
/// DELETE /workspace/:id/members/:user_id
/// GET    /workspace/:id/tags
/// POST   /workspace/:id/tags {name}             201 {id, name, workspaceId}
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, CurrentUser, ValidatedJson, ValidatedQuery},
    routes::{not_blank, ArchiveRequest, ArchiveResponse, FollowersQuery, Success},
};
use axum::{extract::State, http::StatusCode, Json};
use notebook_shared::collaboration::workspaces::{self, WorkspaceStats};
use notebook_shared::models::follower::Follower;
use notebook_shared::models::member::{InvitationAction, MemberRole, MemberStatus, WorkspaceMember};
use notebook_shared::models::tag::Tag;
use notebook_shared::models::workspace::Visibility;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[validate(length(min = 1, max = 100, message = "userIds must contain 1-100 users"))]
    pub user_ids: Vec<Uuid>,

    #[serde(default)]
    pub role: MemberRole,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub success: bool,
    pub invited: u64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RespondRequest {
    pub action: InvitationAction,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub success: bool,
    pub status: MemberStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VisibilityRequest {
    pub visibility: Visibility,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub success: bool,
    pub visibility: Visibility,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(
        length(min = 1, max = 50, message = "name must be 1-50 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
}

pub async fn follow(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<(StatusCode, Json<Success>)> {
    workspaces::follow_workspace(&state.db, id, user_id).await?;
    Ok((StatusCode::CREATED, Json(Success::OK)))
}

pub async fn unfollow(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Success>> {
    workspaces::unfollow_workspace(&state.db, id, user_id).await?;
    Ok(Json(Success::OK))
}

pub async fn followers(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<FollowersQuery>,
) -> ApiResult<Json<Vec<Follower>>> {
    let followers =
        workspaces::list_workspace_followers(&state.db, id, query.limit, query.offset).await?;
    Ok(Json(followers))
}

pub async fn invite(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<InviteRequest>,
) -> ApiResult<(StatusCode, Json<InviteResponse>)> {
    let invited = workspaces::invite(&state.db, id, user_id, &req.user_ids, req.role).await?;

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            success: true,
            invited,
        }),
    ))
}

pub async fn respond(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<RespondRequest>,
) -> ApiResult<Json<RespondResponse>> {
    let status = workspaces::respond_to_invitation(&state.db, id, user_id, req.action).await?;

    Ok(Json(RespondResponse {
        success: true,
        status,
    }))
}

pub async fn archive(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<ArchiveRequest>,
) -> ApiResult<Json<ArchiveResponse>> {
    workspaces::set_workspace_archived(&state.db, id, user_id, req.archived).await?;

    Ok(Json(ArchiveResponse {
        success: true,
        archived: req.archived,
    }))
}

pub async fn set_visibility(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<VisibilityRequest>,
) -> ApiResult<Json<VisibilityResponse>> {
    workspaces::set_workspace_visibility(&state.db, id, user_id, req.visibility).await?;

    Ok(Json(VisibilityResponse {
        success: true,
        visibility: req.visibility,
    }))
}

pub async fn stats(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<WorkspaceStats>> {
    Ok(Json(workspaces::workspace_stats(&state.db, id).await?))
}

pub async fn members(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<WorkspaceMember>>> {
    Ok(Json(workspaces::list_members(&state.db, id).await?))
}

pub async fn remove_member(
    State(state): State<AppState>,
    ApiPath((id, member_id)): ApiPath<(Uuid, Uuid)>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Success>> {
    workspaces::remove_member(&state.db, id, user_id, member_id).await?;
    Ok(Json(Success::OK))
}

pub async fn list_tags(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(workspaces::list_tags(&state.db, id).await?))
}

pub async fn create_tag(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let tag = workspaces::create_tag(&state.db, id, user_id, req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}
