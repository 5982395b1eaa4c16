/// Note collaboration endpoints
///
/// # Endpoints
///
/// ```text
/// POST   /note/:id/follow                 201 {success}     401 403 404 409
/// DELETE /note/:id/follow                 200 {success}     401 404
/// GET    /note/:id/followers?limit&offset 200 [{userId, followedAt}]
/// POST   /note/:id/view                   200 {success}     401 404
/// GET    /note/:id/viewers?limit          200 [{userId, lastViewedAt, viewCount}]
/// GET    /note/:id/stats                  200 {followerCount, viewerCount, totalViews, status}
/// PATCH  /note/:id/archive {archived}     200 {success, archived}  401 403 404
/// GET    /note/:id/tags
/// PUT    /note/:id/tags/:tag_id           note owner; tag from the note's workspace
/// DELETE /note/:id/tags/:tag_id
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, CurrentUser, ValidatedJson, ValidatedQuery},
    routes::{ArchiveRequest, ArchiveResponse, FollowersQuery, Success},
};
use axum::{extract::State, http::StatusCode, Json};
use notebook_shared::collaboration::notes::{self, NoteStats};
use notebook_shared::models::follower::Follower;
use notebook_shared::models::tag::Tag;
use notebook_shared::models::viewer::NoteViewer;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

fn default_viewers_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize, Validate)]
pub struct ViewersQuery {
    #[serde(default = "default_viewers_limit")]
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: i64,
}

pub async fn follow(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<(StatusCode, Json<Success>)> {
    notes::follow_note(&state.db, id, user_id).await?;
    Ok((StatusCode::CREATED, Json(Success::OK)))
}

pub async fn unfollow(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Success>> {
    notes::unfollow_note(&state.db, id, user_id).await?;
    Ok(Json(Success::OK))
}

pub async fn followers(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<FollowersQuery>,
) -> ApiResult<Json<Vec<Follower>>> {
    let followers = notes::list_note_followers(&state.db, id, query.limit, query.offset).await?;
    Ok(Json(followers))
}

pub async fn record_view(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Success>> {
    notes::record_view(&state.db, id, user_id).await?;
    Ok(Json(Success::OK))
}

pub async fn viewers(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<ViewersQuery>,
) -> ApiResult<Json<Vec<NoteViewer>>> {
    Ok(Json(notes::list_note_viewers(&state.db, id, query.limit).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<NoteStats>> {
    Ok(Json(notes::note_stats(&state.db, id).await?))
}

pub async fn archive(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    CurrentUser(user_id): CurrentUser,
    ValidatedJson(req): ValidatedJson<ArchiveRequest>,
) -> ApiResult<Json<ArchiveResponse>> {
    notes::set_note_archived(&state.db, id, user_id, req.archived).await?;

    Ok(Json(ArchiveResponse {
        success: true,
        archived: req.archived,
    }))
}

pub async fn list_tags(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(notes::list_note_tags(&state.db, id).await?))
}

pub async fn attach_tag(
    State(state): State<AppState>,
    ApiPath((id, tag_id)): ApiPath<(Uuid, Uuid)>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Success>> {
    notes::attach_tag(&state.db, id, tag_id, user_id).await?;
    Ok(Json(Success::OK))
}

pub async fn detach_tag(
    State(state): State<AppState>,
    ApiPath((id, tag_id)): ApiPath<(Uuid, Uuid)>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<Success>> {
    notes::detach_tag(&state.db, id, tag_id, user_id).await?;
    Ok(Json(Success::OK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewers_query_default_and_bounds() {
        let query: ViewersQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
        assert!(query.validate().is_ok());

        assert!(ViewersQuery { limit: 50 }.validate().is_ok());
        assert!(ViewersQuery { limit: 0 }.validate().is_err());
        assert!(ViewersQuery { limit: 51 }.validate().is_err());
    }
}
