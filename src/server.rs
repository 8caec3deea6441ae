//!
//! hostbook HTTP server
//! --------------------
//! This module defines the Axum-based HTTP API for the server inventory.
//! Routes are thin: resolve the caller's session, translate identifiers at
//! the boundary, delegate to the store traits and map every failure through
//! `ApiError`.
//!
//! Responsibilities:
//! - Bearer-token session resolution on every protected route.
//! - Registration and login endpoints backed by the `security` module.
//! - Profile read/update endpoints for the authenticated account.
//! - Ownership-scoped CRUD endpoints for server records.
//! - Liveness probe at `/`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderMap, header},
    routing::{get, post},
};
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::error::{ApiError, ApiResult};
use crate::identity::{Identity, SessionManager};
use crate::store::{FileStore, MemoryStore, ServerStore, UserStore};

pub mod servers;
pub mod users;

/// Shared server state injected into all handlers.
///
/// Holds the two store handles (same backend object in practice, split by
/// trait), the session manager that owns all live bearer tokens, and the
/// list-response cap.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub servers: Arc<dyn ServerStore>,
    pub sessions: Arc<SessionManager>,
    pub list_limit: usize,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    // auth scheme names compare case-insensitively (RFC 7235)
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("Bearer") { Some(token) } else { None }
}

/// Resolve the caller from the Authorization header. Missing header, a
/// non-bearer scheme, and an unknown or expired token all surface as the
/// same `Unauthorized`.
pub(crate) fn require_identity(state: &AppState, headers: &HeaderMap) -> ApiResult<Identity> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
    state.sessions.validate(token).ok_or(ApiError::Unauthorized)
}

/// Mount all routes onto the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "hostbook ok" }))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/users/me", get(users::me).put(users::update_profile))
        .route("/servers/", get(servers::list).post(servers::create))
        .route(
            "/servers/{id}",
            get(servers::get_one).put(servers::update).delete(servers::delete),
        )
        .with_state(state)
}

/// Build the shared state for the configured store backend.
pub fn build_state(cfg: &Config) -> anyhow::Result<AppState> {
    let (users, servers): (Arc<dyn UserStore>, Arc<dyn ServerStore>) = match cfg.backend {
        StoreBackend::File => {
            let store = Arc::new(FileStore::open(&cfg.db_root).with_context(|| {
                format!("While opening file store under db_root: {}", cfg.db_root)
            })?);
            let users: Arc<dyn UserStore> = store.clone();
            let servers: Arc<dyn ServerStore> = store;
            (users, servers)
        }
        StoreBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let servers: Arc<dyn ServerStore> = store;
            (users, servers)
        }
    };
    Ok(AppState {
        users,
        servers,
        sessions: Arc::new(SessionManager::new(Duration::from_secs(cfg.session_ttl_secs))),
        list_limit: cfg.list_limit,
    })
}

/// Start the HTTP server with the given configuration and serve until the
/// process is stopped.
pub async fn run_with_config(cfg: Config) -> anyhow::Result<()> {
    info!(
        target: "startup",
        "hostbook starting: backend={:?} db_root='{}' port={} session_ttl_secs={} list_limit={}",
        cfg.backend, cfg.db_root, cfg.http_port, cfg.session_ttl_secs, cfg.list_limit
    );
    let state = build_state(&cfg)?;
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", cfg.http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Convenience entry that reads configuration from the environment.
pub async fn run() -> anyhow::Result<()> {
    run_with_config(Config::from_env()).await
}
