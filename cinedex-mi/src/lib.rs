//! cinedex-mi - Movie Ingest service
//!
//! The single writer of durable state. Looks titles up against OMDb,
//! classifies them, and persists records, sessions, and watchlists to the
//! shared database. cinedex-dr reads the same file for review and stats.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::services::OmdbClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// OMDb client, absent until an API key is configured
    pub omdb: Arc<RwLock<Option<Arc<OmdbClient>>>>,
    /// Cancellation tokens for active ingest sessions
    pub cancellation_tokens: Arc<RwLock<HashMap<Uuid, CancellationToken>>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, omdb: Option<OmdbClient>) -> Self {
        Self {
            db,
            omdb: Arc::new(RwLock::new(omdb.map(Arc::new))),
            cancellation_tokens: Arc::new(RwLock::new(HashMap::new())),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the configured OMDb client, or a 400 telling the caller to
    /// configure a key first
    pub async fn metadata_client(&self) -> ApiResult<Arc<OmdbClient>> {
        self.omdb.read().await.clone().ok_or_else(|| {
            ApiError::BadRequest(
                "OMDb API key not configured; set it via POST /api/settings/omdb_api_key"
                    .to_string(),
            )
        })
    }

    /// Swap in a client for a newly configured key
    pub async fn replace_metadata_client(&self, client: OmdbClient) {
        *self.omdb.write().await = Some(Arc::new(client));
    }

    pub async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::search_routes())
        .merge(api::ingest_routes())
        .merge(api::settings_routes())
        .merge(api::watchlist_routes())
        .with_state(state)
}
