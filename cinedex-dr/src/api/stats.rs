//! Aggregate statistics endpoints
//!
//! JSON aggregates for the review charts: genre distribution, rating
//! histogram, and release-decade trend.

use axum::{extract::State, Json};

use crate::db::stats::{self, LabelCount, RatingHistogram, Summary};
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/stats/summary
pub async fn stats_summary(State(state): State<AppState>) -> ApiResult<Json<Summary>> {
    Ok(Json(stats::summary(&state.db).await?))
}

/// GET /api/stats/genres
pub async fn stats_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<LabelCount>>> {
    Ok(Json(stats::genre_distribution(&state.db).await?))
}

/// GET /api/stats/ratings
pub async fn stats_ratings(State(state): State<AppState>) -> ApiResult<Json<RatingHistogram>> {
    Ok(Json(stats::rating_histogram(&state.db).await?))
}

/// GET /api/stats/years
pub async fn stats_years(State(state): State<AppState>) -> ApiResult<Json<Vec<LabelCount>>> {
    Ok(Json(stats::year_trend(&state.db).await?))
}
