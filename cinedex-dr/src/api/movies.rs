//! Paginated movie listing with validated filters
//!
//! GET /api/movies?genre_bucket=&rating_tier=&year_min=&year_max=&page=
//!
//! Unsupported filter values fail with 400 rather than silently ignoring
//! constraints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::movies::{self, MovieFilter, MovieRow};
use crate::error::ApiResult;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

/// Query parameters for the movie listing
#[derive(Debug, Default, Deserialize)]
pub struct MovieListQuery {
    pub genre_bucket: Option<String>,
    pub rating_tier: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Listing response with results and pagination metadata
#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub movies: Vec<MovieRow>,
}

/// GET /api/movies
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> ApiResult<Json<MovieListResponse>> {
    let filter = MovieFilter::parse(
        query.genre_bucket.as_deref(),
        query.rating_tier.as_deref(),
        query.year_min,
        query.year_max,
    )?;

    let total_results = movies::count_movies(&state.db, &filter).await?;
    let p = calculate_pagination(total_results, query.page);

    let rows = movies::list_movies(&state.db, &filter, PAGE_SIZE, p.offset).await?;

    Ok(Json(MovieListResponse {
        total_results,
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        movies: rows,
    }))
}
