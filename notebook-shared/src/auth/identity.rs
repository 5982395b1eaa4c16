/// Request identity resolution
///
/// Handlers never read credentials themselves. They ask an
/// [`IdentityResolver`] which user, if any, issued the request, so the
/// mechanism can change without touching any route.
///
/// # Resolvers
///
/// - [`HeaderIdentity`]: trusts the `x-user-id` header. Meant to sit behind a
///   gateway that has already authenticated the caller.
/// - [`JwtIdentity`]: validates an `Authorization: Bearer <token>` header
///   with HS256 and uses the `sub` claim.
///
/// # Example
///
/// ```
/// use axum::http::HeaderMap;
/// use notebook_shared::auth::identity::{HeaderIdentity, IdentityResolver, USER_ID_HEADER};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let mut headers = HeaderMap::new();
/// headers.insert(USER_ID_HEADER, user_id.to_string().parse().unwrap());
///
/// assert_eq!(HeaderIdentity.resolve(&headers).unwrap(), Some(user_id));
/// ```

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use super::token::{validate_token, TokenError};

/// Header carrying the caller's user ID in header mode
pub const USER_ID_HEADER: &str = "x-user-id";

/// Error resolving the caller's identity
///
/// Every variant means the request is unauthenticated.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid authorization header format: {0}")]
    InvalidFormat(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Resolves the user behind a request
pub trait IdentityResolver: Send + Sync + 'static {
    /// Returns `Ok(None)` when the request carries no credentials at all
    fn resolve(&self, headers: &HeaderMap) -> Result<Option<Uuid>, AuthError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Trusts the `x-user-id` header
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderIdentity;

impl IdentityResolver for HeaderIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Result<Option<Uuid>, AuthError> {
        let Some(value) = headers.get(USER_ID_HEADER) else {
            return Ok(None);
        };

        let raw = value
            .to_str()
            .map_err(|_| AuthError::InvalidUserId("non-ASCII header value".to_string()))?
            .trim();

        if raw.is_empty() {
            return Ok(None);
        }

        Uuid::parse_str(raw)
            .map(Some)
            .map_err(|e| AuthError::InvalidUserId(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "header"
    }
}

/// Validates HS256 bearer tokens
#[derive(Clone)]
pub struct JwtIdentity {
    secret: String,
}

impl JwtIdentity {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for JwtIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentity")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl IdentityResolver for JwtIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Result<Option<Uuid>, AuthError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };

        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidFormat("non-ASCII header value".to_string()))?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::InvalidFormat("expected 'Bearer <token>'".to_string()))?;

        let claims = validate_token(token.trim(), &self.secret)?;
        Ok(Some(claims.sub))
    }

    fn name(&self) -> &'static str {
        "jwt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{create_token, Claims};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_header_identity_valid() {
        let user_id = Uuid::new_v4();
        let headers = headers_with(USER_ID_HEADER, &user_id.to_string());

        assert_eq!(HeaderIdentity.resolve(&headers).unwrap(), Some(user_id));
    }

    #[test]
    fn test_header_identity_missing_or_blank() {
        assert_eq!(HeaderIdentity.resolve(&HeaderMap::new()).unwrap(), None);
        assert_eq!(
            HeaderIdentity.resolve(&headers_with(USER_ID_HEADER, "  ")).unwrap(),
            None
        );
    }

    #[test]
    fn test_header_identity_rejects_non_uuid() {
        let headers = headers_with(USER_ID_HEADER, "user-42");
        assert!(matches!(
            HeaderIdentity.resolve(&headers),
            Err(AuthError::InvalidUserId(_))
        ));
    }

    #[test]
    fn test_jwt_identity_valid() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();
        let headers = headers_with("authorization", &format!("Bearer {}", token));

        let resolver = JwtIdentity::new(SECRET);
        assert_eq!(resolver.resolve(&headers).unwrap(), Some(user_id));
    }

    #[test]
    fn test_jwt_identity_missing_header() {
        assert_eq!(JwtIdentity::new(SECRET).resolve(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_jwt_identity_wrong_scheme() {
        let headers = headers_with("authorization", "Basic dXNlcjpwYXNz");
        assert!(matches!(
            JwtIdentity::new(SECRET).resolve(&headers),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_jwt_identity_bad_token() {
        let headers = headers_with("authorization", "Bearer nope");
        assert!(matches!(
            JwtIdentity::new(SECRET).resolve(&headers),
            Err(AuthError::Token(_))
        ));
    }

    #[test]
    fn test_jwt_identity_debug_redacts_secret() {
        let debug = format!("{:?}", JwtIdentity::new(SECRET));
        assert!(!debug.contains(SECRET));
    }
}
