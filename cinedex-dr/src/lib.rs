//! cinedex-dr library - Database Review service
//!
//! Read-only inspection of the shared cinedex database: paginated browsing,
//! validated filters, aggregate statistics, and export.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/api/movies", get(api::list_movies))
        .route("/api/stats/summary", get(api::stats_summary))
        .route("/api/stats/genres", get(api::stats_genres))
        .route("/api/stats/ratings", get(api::stats_ratings))
        .route("/api/stats/years", get(api::stats_years))
        .route("/api/export/movies.csv", get(api::export_movies_csv))
        .route("/api/export/movies.json", get(api::export_movies_json))
        .merge(api::health_routes())
        .with_state(state)
}
