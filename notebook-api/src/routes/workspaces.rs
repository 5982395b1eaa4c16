/// Workspace creation and listing
///
/// `POST /workspaces` creates a workspace owned by the caller and moves any
/// of the caller's notes listed in `noteIds` into it. `GET /workspaces`
/// lists the workspaces the caller owns or is an active member of.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{CurrentUser, ValidatedJson},
    routes::not_blank,
};
use axum::{extract::State, http::StatusCode, Json};
use notebook_shared::collaboration::workspaces;
use notebook_shared::models::workspace::{CreateWorkspace, Visibility, Workspace};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    #[validate(
        length(min = 1, max = 100, message = "name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    #[validate(length(max = 100, message = "at most 100 notes can be moved at once"))]
    pub note_ids: Vec<Uuid>,
}

pub async fn list_workspaces(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Vec<Workspace>>> {
    Ok(Json(workspaces::list_workspaces(&state.db, user_id).await?))
}

pub async fn create_workspace(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateWorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    let data = CreateWorkspace {
        name: req.name.trim().to_string(),
        description: req.description,
        visibility: req.visibility,
        created_by: user_id,
    };

    let workspace = workspaces::create_workspace(&state.db, data, &req.note_ids).await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}
