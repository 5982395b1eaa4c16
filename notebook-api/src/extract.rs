/// Request extractors
///
/// Wrappers around axum's `Json`, `Query` and `Path` that turn every
/// rejection into an [`ApiError`], so malformed requests get the same JSON
/// error body as everything else, plus [`CurrentUser`] for the caller's
/// identity.
///
/// # Example
///
/// ```no_run
/// use notebook_api::extract::{ApiPath, CurrentUser, ValidatedQuery};
/// use serde::Deserialize;
/// use uuid::Uuid;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Paging {
///     #[validate(range(min = 1, max = 100))]
///     limit: i64,
/// }
///
/// async fn handler(
///     ApiPath(id): ApiPath<Uuid>,
///     CurrentUser(user_id): CurrentUser,
///     ValidatedQuery(paging): ValidatedQuery<Paging>,
/// ) {
///     // ...
/// }
/// ```

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::{app::AppState, error::ApiError};

/// JSON body that has been deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that has been deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters; an id that does not parse is a 400
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// The authenticated caller
///
/// Resolved through the configured identity resolver. Missing or invalid
/// credentials reject the request with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.identity.resolve(&parts.headers)? {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => Err(ApiError::Unauthorized("Unauthorized".to_string())),
        }
    }
}
