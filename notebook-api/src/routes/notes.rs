/// Note authoring endpoints
///
/// # Endpoints
///
/// ```text
/// POST   /notes                 create (author = caller)     -> 201
/// GET    /notes                 every live note, newest first
/// GET    /notes/recent?limit    pinned first, then most recently updated
/// GET    /notes/search?query    caller's notes with exactly this title
/// GET    /notes/:id
/// PATCH  /notes/:id             owner only
/// DELETE /notes/:id             owner only, soft delete
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, CurrentUser, ValidatedJson, ValidatedQuery},
    routes::not_blank,
};
use axum::{extract::State, http::StatusCode, Json};
use notebook_shared::collaboration::notes;
use notebook_shared::models::note::{CreateNote, Note, NoteStatus, UpdateNote};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub workspace_id: Option<Uuid>,

    #[serde(default)]
    pub status: NoteStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "require_some_field"))]
pub struct UpdateNoteRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,

    pub status: Option<NoteStatus>,
    pub pinned: Option<bool>,
}

fn require_some_field(req: &UpdateNoteRequest) -> Result<(), ValidationError> {
    if req.title.is_none() && req.content.is_none() && req.status.is_none() && req.pinned.is_none() {
        let mut err = ValidationError::new("empty_update");
        err.message = Some("At least one field must be provided".into());
        return Err(err);
    }

    if req.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        let mut err = ValidationError::new("blank");
        err.message = Some("Title must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn default_recent_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "query is required"))]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteNoteResponse {
    pub success: bool,
    pub id: Uuid,
}

pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let note = notes::create_note(
        &state.db,
        CreateNote {
            title: req.title,
            content: req.content,
            status: req.status,
            workspace_id: req.workspace_id,
            created_by: user_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn list_notes(State(state): State<AppState>) -> ApiResult<Json<Vec<Note>>> {
    Ok(Json(Note::list_all(&state.db).await?))
}

pub async fn recent_notes(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<RecentQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    Ok(Json(Note::list_recent(&state.db, query.limit).await?))
}

pub async fn search_notes(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    Ok(Json(
        Note::search_by_title(&state.db, user_id, &query.query).await?,
    ))
}

pub async fn get_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Note>> {
    Ok(Json(notes::get_note(&state.db, id).await?))
}

pub async fn update_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let note = notes::update_note(
        &state.db,
        id,
        user_id,
        UpdateNote {
            title: req.title,
            content: req.content,
            status: req.status,
            pinned: req.pinned,
        },
    )
    .await?;

    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<DeleteNoteResponse>> {
    notes::delete_note(&state.db, id, user_id).await?;
    Ok(Json(DeleteNoteResponse { success: true, id }))
}
