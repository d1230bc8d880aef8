//! pgrid-server library - catalog and filter resolution service
//!
//! Backs the grid engine: serves the post and term listings a grid mounts
//! from, and resolves active filter selections to ordered post id lists.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Every route is public: the catalog holds the same data the rendered
/// site exposes, so there is nothing to protect.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/v1/dynamic-grid", get(api::resolve_dynamic_grid))
        .route("/v1/terms", get(api::list_terms))
        .route("/v1/posts", get(api::list_posts))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
