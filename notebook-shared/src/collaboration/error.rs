//! Collaboration error type

use crate::db::{is_foreign_key_violation, is_unique_violation};

/// Failure of a collaboration operation
///
/// Messages are safe to show to clients except for [`CollabError::Database`],
/// whose details stay in the logs.
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    /// The caller's user id doesn't belong to any user
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    /// Request is well-formed but refers to things that don't fit together
    #[error("{0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CollabError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        CollabError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        CollabError::Forbidden(msg.into())
    }

    /// Turns a unique violation into `Conflict(msg)`; other errors pass through
    pub fn conflict_on_duplicate(err: sqlx::Error, msg: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            CollabError::Conflict(msg.into())
        } else {
            CollabError::Database(err)
        }
    }

    /// Classifies a failed write made on the caller's behalf
    ///
    /// Only use where every other referenced row was checked first, so the
    /// only foreign key left to violate is the caller's own user id.
    pub fn unknown_caller(err: sqlx::Error) -> Self {
        if is_foreign_key_violation(&err) {
            CollabError::Unauthenticated(UNKNOWN_USER.to_string())
        } else {
            CollabError::Database(err)
        }
    }

    /// [`CollabError::unknown_caller`] plus duplicate detection
    pub fn caller_insert(err: sqlx::Error, duplicate: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            CollabError::Conflict(duplicate.into())
        } else {
            CollabError::unknown_caller(err)
        }
    }
}

pub type CollabResult<T> = Result<T, CollabError>;

const UNKNOWN_USER: &str = "Unknown user";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_unique_errors_stay_database() {
        let err = CollabError::conflict_on_duplicate(sqlx::Error::RowNotFound, "Already following");
        assert!(matches!(err, CollabError::Database(_)));
    }

    #[test]
    fn test_caller_errors_without_sqlstate_stay_database() {
        assert!(matches!(
            CollabError::unknown_caller(sqlx::Error::RowNotFound),
            CollabError::Database(_)
        ));
        assert!(matches!(
            CollabError::caller_insert(sqlx::Error::PoolTimedOut, "Already following"),
            CollabError::Database(_)
        ));
    }

    #[test]
    fn test_display_uses_message() {
        assert_eq!(CollabError::not_found("Note not found").to_string(), "Note not found");
        assert_eq!(
            CollabError::forbidden("Only workspace owner can invite").to_string(),
            "Only workspace owner can invite"
        );
    }
}
