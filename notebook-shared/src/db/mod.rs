/// Database layer for Notebook
///
/// This module provides database connection pooling, migrations, and helpers
/// for interpreting storage errors by SQLSTATE.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Database migration runner
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use notebook_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;

/// SQLSTATE raised by PostgreSQL when a unique index rejects an insert or update
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for a row referencing a key that doesn't exist
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// SQLSTATE for `CREATE DATABASE` on a name that is taken
pub const DUPLICATE_DATABASE: &str = "42P04";

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Returns true if the error is PostgreSQL's duplicate-key signal
///
/// Concurrent inserts of the same follower/member/tag pair race on a unique
/// index; exactly one wins and the others land here.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

/// True when `CREATE DATABASE` lost a race with another creator
///
/// Depending on timing PostgreSQL reports either 42P04 or a unique violation
/// on `pg_database_datname_index`.
pub fn is_duplicate_database(err: &sqlx::Error) -> bool {
    matches!(
        sqlstate(err).as_deref(),
        Some(DUPLICATE_DATABASE) | Some(UNIQUE_VIOLATION)
    )
}
