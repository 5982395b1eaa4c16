/// User endpoints
///
/// Registration normally belongs to the identity provider. These endpoints
/// create and look up the user rows that every ownership column references.
///
/// # Endpoints
///
/// ```text
/// POST   /users     {email, name}  -> 201 user, 409 duplicate email
/// GET    /users/:id                  -> 200 user, 404
/// DELETE /users/:id                  -> 200 {success}, 403 unless the caller, 404
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, CurrentUser, ValidatedJson},
    routes::{not_blank, Success},
};
use axum::{extract::State, http::StatusCode, Json};
use notebook_shared::collaboration::users;
use notebook_shared::models::user::{CreateUser, User};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = users::create_user(
        &state.db,
        CreateUser {
            email: req.email.trim().to_lowercase(),
            name: req.name.trim().to_string(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<User>> {
    Ok(Json(users::get_user(&state.db, id).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Success>> {
    users::delete_user(&state.db, id, user_id).await?;
    Ok(Json(Success::OK))
}
