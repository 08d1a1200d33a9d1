//! Development API server: the remote document store and identity backend the
//! console talks to over HTTP.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod response;
pub mod seed;
pub mod users;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::ServerConfig;
use crate::store::MemoryStore;
use users::UserDirectory;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub users: UserDirectory,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: MemoryStore::new(),
            users: UserDirectory::new(),
            config: Arc::new(config),
        }
    }

    /// State with the configured seed data loaded
    pub async fn seeded(config: ServerConfig) -> Self {
        let state = Self::new(config);
        if state.config.seed_courses {
            seed::seed_courses(&state.store).await;
        }
        state
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/health", get(handlers::health))
        .merge(auth_public_routes())
        // Bearer JWT required
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::data;

    Router::new()
        .route("/api/auth/whoami", get(handlers::auth::whoami))
        .route("/api/data/:kind", get(data::list).post(data::create))
        .route("/api/data/:kind/:id", put(data::update).delete(data::delete))
        .route_layer(middleware::from_fn_with_state(state, auth::require_bearer))
}

/// Serve `state` on an already bound listener until the task is dropped
pub async fn run(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    info!("Student Vault dev server listening on http://{}", addr);
    axum::serve(listener, app(state)).await.context("server error")
}

/// Bind the configured port and serve a freshly seeded store
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    run(listener, AppState::seeded(config.clone()).await).await
}
