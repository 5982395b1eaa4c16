/// Database models for Notebook
///
/// Each model owns the SQL for its table. Query functions are generic over
/// [`sqlx::PgExecutor`] so they run equally against the pool or inside a
/// transaction (`&mut *tx`).
///
/// # Models
///
/// - `user`: Identity root referenced by every ownership column
/// - `note`: User-authored documents with cached follower/viewer counters
/// - `workspace`: Containers for notes and members
/// - `member`: Invitation-gated workspace membership
/// - `follower`: Follow relations for notes and workspaces
/// - `viewer`: Per-user note view tracking
/// - `tag`: Workspace-scoped tags and their note attachments
/// - `post`: Standalone posts with integer IDs
///
/// # Example
///
/// ```no_run
/// use notebook_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "ada@example.com".to_string(),
///     name: "Ada".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod follower;
pub mod member;
pub mod note;
pub mod post;
pub mod tag;
pub mod user;
pub mod viewer;
pub mod workspace;
