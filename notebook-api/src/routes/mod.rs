/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User registration, lookup and self-deletion
/// - `posts`: Standalone posts (`/posts`)
/// - `notes`: Note authoring (`/notes`)
/// - `note_collaboration`: Follow, views, stats, archive and tags (`/note/:id/...`)
/// - `workspaces`: Workspace creation and listing (`/workspaces`)
/// - `workspace_collaboration`: Follow, invitations, members, archive,
///   visibility, stats and tags (`/workspace/:id/...`)

pub mod health;
pub mod note_collaboration;
pub mod notes;
pub mod posts;
pub mod users;
pub mod workspace_collaboration;
pub mod workspaces;

use serde::Serialize;
use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is removed
///
/// Pair with `length` so the bounds hold for the trimmed value that gets
/// stored.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// `{ "success": true }`, the body of most state-changing endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub const OK: Success = Success { success: true };
}

fn default_followers_limit() -> i64 {
    20
}

/// Pagination for follower listings
#[derive(Debug, Clone, serde::Deserialize, validator::Validate)]
pub struct FollowersQuery {
    #[serde(default = "default_followers_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "offset must be at least 0"))]
    pub offset: i64,
}

/// `{ "archived": bool }`
#[derive(Debug, Clone, Copy, serde::Deserialize, validator::Validate)]
pub struct ArchiveRequest {
    pub archived: bool,
}

/// `{ "success": true, "archived": bool }`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArchiveResponse {
    pub success: bool,
    pub archived: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_followers_query_defaults() {
        let query: FollowersQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_followers_query_bounds() {
        let ok = FollowersQuery { limit: 100, offset: 0 };
        assert!(ok.validate().is_ok());

        assert!(FollowersQuery { limit: 0, offset: 0 }.validate().is_err());
        assert!(FollowersQuery { limit: 101, offset: 0 }.validate().is_err());
        assert!(FollowersQuery { limit: 1, offset: -1 }.validate().is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Lab").is_ok());
        assert!(not_blank("  Lab ").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t\n ").is_err());
    }

    #[test]
    fn test_success_body() {
        assert_eq!(
            serde_json::to_value(Success::OK).unwrap(),
            serde_json::json!({ "success": true })
        );
    }
}
