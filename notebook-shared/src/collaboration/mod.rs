/// Collaboration service
///
/// Every operation takes the pool, runs its checks and writes, and returns a
/// [`CollabError`] the API layer maps onto an HTTP status. Operations that
/// touch more than one row (follow, unfollow, view recording, workspace
/// creation) run inside a single transaction, and cached counters are only
/// ever changed with relative updates in that transaction.
///
/// # Modules
///
/// - [`notes`]: Note authoring, follow, views, archive, stats and tags
/// - [`workspaces`]: Workspace creation, follow, invitations, membership,
///   archive, visibility, stats and tags
/// - [`users`]: User registration and lookup
///
/// # Example
///
/// ```no_run
/// use notebook_shared::collaboration::{notes, CollabError};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, note_id: Uuid, user_id: Uuid) -> Result<(), CollabError> {
/// notes::follow_note(&pool, note_id, user_id).await?;
/// let stats = notes::note_stats(&pool, note_id).await?;
/// assert!(stats.follower_count >= 1);
/// # Ok(())
/// # }
/// ```

pub mod error;
pub mod notes;
pub mod users;
pub mod workspaces;

pub use error::{CollabError, CollabResult};
