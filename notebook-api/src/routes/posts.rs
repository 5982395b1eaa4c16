/// Post endpoints
///
/// Posts need no identity; any client may create, edit or delete them.
///
/// # Endpoints
///
/// ```text
/// POST   /posts        -> 201
/// GET    /posts        newest first
/// GET    /posts/:id
/// PATCH  /posts/:id
/// DELETE /posts/:id    hard delete -> {success, id}
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ValidatedJson},
    routes::not_blank,
};
use axum::{extract::State, http::StatusCode, Json};
use notebook_shared::models::post::{CreatePost, Post, UpdatePost};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "require_title_or_content"))]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
}

fn require_title_or_content(req: &UpdatePostRequest) -> Result<(), ValidationError> {
    if req.title.is_none() && req.content.is_none() {
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

#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    pub success: bool,
    pub id: i32,
}

fn post_not_found() -> ApiError {
    ApiError::NotFound("Post not found".to_string())
}

pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = Post::create(
        &state.db,
        CreatePost {
            title: req.title,
            content: req.content,
        },
    )
    .await?;

    info!(post_id = post.id, "Post created");

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(Post::list_all(&state.db).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<Post>> {
    Post::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(post_not_found)
}

pub async fn update_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    Post::update(
        &state.db,
        id,
        UpdatePost {
            title: req.title,
            content: req.content,
        },
    )
    .await?
    .map(Json)
    .ok_or_else(post_not_found)
}

pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<DeletePostResponse>> {
    if !Post::delete(&state.db, id).await? {
        return Err(post_not_found());
    }

    info!(post_id = id, "Post deleted");

    Ok(Json(DeletePostResponse { success: true, id }))
}
