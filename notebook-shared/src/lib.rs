//! # Notebook Shared Library
//!
//! This crate contains the data layer and collaboration logic used by the
//! Notebook API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool, migrations and storage error helpers
//! - `models`: Database models and their queries
//! - `auth`: Identity resolution (`x-user-id` header or bearer token)
//! - `collaboration`: Follow, view, invitation, archive and stats operations

pub mod auth;
pub mod collaboration;
pub mod db;
pub mod models;

/// Current version of the Notebook shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
