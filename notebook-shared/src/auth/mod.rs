/// Authentication utilities
///
/// # Modules
///
/// - [`identity`]: Pluggable resolution of the calling user from request headers
/// - [`token`]: HS256 bearer token creation and validation
///
/// # Example
///
/// ```
/// use axum::http::HeaderMap;
/// use notebook_shared::auth::identity::{IdentityResolver, JwtIdentity};
/// use notebook_shared::auth::token::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-that-is-at-least-32-bytes-long";
/// let user_id = Uuid::new_v4();
/// let token = create_token(&Claims::new(user_id), secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("authorization", format!("Bearer {}", token).parse()?);
///
/// let resolver = JwtIdentity::new(secret);
/// assert_eq!(resolver.resolve(&headers)?, Some(user_id));
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod token;
