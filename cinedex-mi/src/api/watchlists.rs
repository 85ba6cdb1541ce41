//! Watchlist API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::watchlists::{self, Watchlist};
use crate::error::ApiResult;
use crate::models::{ClassificationLabels, MovieRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWatchlistRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CreateWatchlistResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub imdb_id: String,
}

#[derive(Debug, Serialize)]
pub struct WatchlistMovie {
    pub record: MovieRecord,
    pub labels: ClassificationLabels,
}

/// GET /api/watchlists
pub async fn list_watchlists(State(state): State<AppState>) -> ApiResult<Json<Vec<Watchlist>>> {
    Ok(Json(watchlists::list_watchlists(&state.db).await?))
}

/// POST /api/watchlists
pub async fn create_watchlist(
    State(state): State<AppState>,
    Json(request): Json<CreateWatchlistRequest>,
) -> ApiResult<(StatusCode, Json<CreateWatchlistResponse>)> {
    let id = watchlists::create_watchlist(&state.db, &request.name, &request.description).await?;

    tracing::info!(watchlist = %request.name, "Watchlist created");

    Ok((
        StatusCode::CREATED,
        Json(CreateWatchlistResponse {
            id,
            name: request.name.trim().to_string(),
        }),
    ))
}

/// DELETE /api/watchlists/{id}
pub async fn delete_watchlist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    watchlists::delete_watchlist(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/watchlists/{id}/movies
pub async fn watchlist_movies(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<WatchlistMovie>>> {
    let movies = watchlists::watchlist_movies(&state.db, id).await?;
    Ok(Json(
        movies
            .into_iter()
            .map(|(record, labels)| WatchlistMovie { record, labels })
            .collect(),
    ))
}

/// POST /api/watchlists/{id}/movies
pub async fn add_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AddMovieRequest>,
) -> ApiResult<StatusCode> {
    watchlists::add_movie_to_watchlist(&state.db, id, &request.imdb_id).await?;
    Ok(StatusCode::CREATED)
}

/// Build watchlist routes
pub fn watchlist_routes() -> Router<AppState> {
    Router::new()
        .route("/api/watchlists", get(list_watchlists).post(create_watchlist))
        .route("/api/watchlists/:id", delete(delete_watchlist))
        .route(
            "/api/watchlists/:id/movies",
            get(watchlist_movies).post(add_movie),
        )
}
