/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use notebook_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config)?;
/// let app = notebook_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::{AuthConfig, AuthMode, Config},
    middleware::security::SecurityHeadersLayer,
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use notebook_shared::auth::identity::{HeaderIdentity, IdentityResolver, JwtIdentity, USER_ID_HEADER};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,

    /// Resolves the caller behind each request
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    /// Creates state with the identity resolver selected by `config.auth`
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let identity = identity_resolver(&config.auth)?;
        Ok(Self::with_identity(db, config, identity))
    }

    pub fn with_identity(db: PgPool, config: Config, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            identity,
        }
    }
}

/// Builds the resolver for the configured auth mode
pub fn identity_resolver(auth: &AuthConfig) -> anyhow::Result<Arc<dyn IdentityResolver>> {
    match (auth.mode, &auth.jwt_secret) {
        (AuthMode::Header, _) => Ok(Arc::new(HeaderIdentity)),
        (AuthMode::Jwt, Some(secret)) => Ok(Arc::new(JwtIdentity::new(secret.clone()))),
        (AuthMode::Jwt, None) => anyhow::bail!("AUTH_MODE=jwt requires JWT_SECRET"),
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /health                                 GET
/// /users                                  POST
/// /users/:id                              GET, DELETE
/// /notes                                  GET, POST
/// /notes/recent                           GET
/// /notes/search                           GET
/// /notes/:id                              GET, PATCH, DELETE
/// /note/:id/follow                        POST, DELETE
/// /note/:id/followers                     GET
/// /note/:id/view                          POST
/// /note/:id/viewers                       GET
/// /note/:id/stats                         GET
/// /note/:id/archive                       PATCH
/// /note/:id/tags                          GET
/// /note/:id/tags/:tag_id                  PUT, DELETE
/// /workspaces                             GET, POST
/// /workspace/:id/follow                   POST, DELETE
/// /workspace/:id/followers                GET
/// /workspace/:id/invite                   POST
/// /workspace/:id/invitation               PATCH
/// /workspace/:id/archive                  PATCH
/// /workspace/:id/visibility               PATCH
/// /workspace/:id/stats                    GET
/// /workspace/:id/members                  GET
/// /workspace/:id/members/:user_id         DELETE
/// /workspace/:id/tags                     GET, POST
/// /posts                                  GET, POST
/// /posts/:id                              GET, PATCH, DELETE
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{
        health, note_collaboration, notes, posts, users, workspace_collaboration, workspaces,
    };

    let user_routes = Router::new()
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user).delete(users::delete_user));

    let note_routes = Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/recent", get(notes::recent_notes))
        .route("/notes/search", get(notes::search_notes))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route(
            "/note/:id/follow",
            post(note_collaboration::follow).delete(note_collaboration::unfollow),
        )
        .route("/note/:id/followers", get(note_collaboration::followers))
        .route("/note/:id/view", post(note_collaboration::record_view))
        .route("/note/:id/viewers", get(note_collaboration::viewers))
        .route("/note/:id/stats", get(note_collaboration::stats))
        .route("/note/:id/archive", patch(note_collaboration::archive))
        .route("/note/:id/tags", get(note_collaboration::list_tags))
        .route(
            "/note/:id/tags/:tag_id",
            put(note_collaboration::attach_tag).delete(note_collaboration::detach_tag),
        );

    let workspace_routes = Router::new()
        .route(
            "/workspaces",
            get(workspaces::list_workspaces).post(workspaces::create_workspace),
        )
        .route(
            "/workspace/:id/follow",
            post(workspace_collaboration::follow).delete(workspace_collaboration::unfollow),
        )
        .route("/workspace/:id/followers", get(workspace_collaboration::followers))
        .route("/workspace/:id/invite", post(workspace_collaboration::invite))
        .route("/workspace/:id/invitation", patch(workspace_collaboration::respond))
        .route("/workspace/:id/archive", patch(workspace_collaboration::archive))
        .route("/workspace/:id/visibility", patch(workspace_collaboration::set_visibility))
        .route("/workspace/:id/stats", get(workspace_collaboration::stats))
        .route("/workspace/:id/members", get(workspace_collaboration::members))
        .route(
            "/workspace/:id/members/:user_id",
            axum::routing::delete(workspace_collaboration::remove_member),
        )
        .route(
            "/workspace/:id/tags",
            get(workspace_collaboration::list_tags).post(workspace_collaboration::create_tag),
        );

    let post_routes = Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/:id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        );

    let cors = cors_layer(&state.config.api.cors_origins);
    let production = state.config.api.production;

    Router::new()
        .route("/health", get(health::health_check))
        .merge(user_routes)
        .merge(note_routes)
        .merge(workspace_routes)
        .merge(post_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
