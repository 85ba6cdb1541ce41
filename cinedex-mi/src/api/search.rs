//! Single title search
//!
//! Looks one title up against OMDb, classifies it, and stores the result.
//! The interactive twin of the batch pipeline.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::{ClassificationLabels, MovieRecord};
use crate::services::{classifier, OmdbError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub record: MovieRecord,
    pub labels: ClassificationLabels,
    /// Whether this title was already in the store before the lookup
    pub previously_stored: bool,
}

/// GET /api/search?title=...
pub async fn search_title(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let title = query.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Title is empty".to_string()));
    }

    let client = state.metadata_client().await?;

    let record = match client.lookup_title(title).await {
        Ok(record) => record,
        Err(OmdbError::InvalidTitle) => {
            return Err(ApiError::BadRequest("Title is empty".to_string()))
        }
        Err(OmdbError::NotFound(t)) => {
            return Err(ApiError::NotFound(format!("Title not found: {}", t)))
        }
        Err(e) => {
            state.record_error(e.to_string()).await;
            return Err(ApiError::Provider(e.to_string()));
        }
    };

    let labels = classifier::classify(&record);

    let previously_stored = crate::db::movies::movie_exists(&state.db, &record.imdb_id).await?;
    crate::db::movies::upsert_movie(&state.db, &record, &labels).await?;

    tracing::info!(
        title = %record.title,
        imdb_id = %record.imdb_id,
        "Search result stored"
    );

    Ok(Json(SearchResponse {
        record,
        labels,
        previously_stored,
    }))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/api/search", get(search_title))
}
