//! Review API integration tests
//!
//! Seed an in-memory database through the shared schema, then exercise the
//! listing, stats, and export endpoints through the router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use cinedex_dr::{build_router, AppState};

/// One connection only: pooled in-memory connections are separate dbs
async fn seeded_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    cinedex_common::db::init::create_schema(&pool).await.unwrap();

    seed_movie(&pool, "tt0111161", "The Shawshank Redemption", Some(1994), Some(9.3), "drama", "high", "1990s").await;
    seed_movie(&pool, "tt1375666", "Inception", Some(2010), Some(8.8), "action", "high", "2010s").await;
    seed_movie(&pool, "tt0078748", "Alien", Some(1979), Some(8.5), "thriller", "high", "1970s").await;
    seed_movie(&pool, "tt0118589", "Spice World", Some(1997), Some(3.5), "comedy", "low", "1990s").await;
    seed_movie(&pool, "tt0401729", "Obscure Short", None, None, "unknown", "unrated", "Unknown").await;
    seed_movie(&pool, "tt0050083", "12 Angry Men", Some(1957), Some(10.0), "drama", "high", "1950s").await;

    pool
}

async fn seed_movie(
    pool: &SqlitePool,
    imdb_id: &str,
    title: &str,
    year: Option<i32>,
    rating: Option<f64>,
    genre_bucket: &str,
    rating_tier: &str,
    era_bucket: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO movies (imdb_id, title, year, genres, rating, genre_bucket, rating_tier, era_bucket)
        VALUES (?, ?, ?, '["Drama"]', ?, ?, ?, ?)
        "#,
    )
    .bind(imdb_id)
    .bind(title)
    .bind(year)
    .bind(rating)
    .bind(genre_bucket)
    .bind(rating_tier)
    .bind(era_bucket)
    .execute(pool)
    .await
    .unwrap();
}

async fn get_json(pool: SqlitePool, uri: &str) -> (StatusCode, Value) {
    let app = build_router(AppState::new(pool));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn listing_returns_every_movie_with_pagination_metadata() {
    let (status, body) = get_json(seeded_pool().await, "/api/movies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 6);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["movies"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn genre_bucket_filter_narrows_the_listing() {
    let (status, body) = get_json(seeded_pool().await, "/api/movies?genre_bucket=drama").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 2);
    for movie in body["movies"].as_array().unwrap() {
        assert_eq!(movie["genre_bucket"], "drama");
    }
}

#[tokio::test]
async fn unrated_is_a_valid_rating_tier_filter() {
    let (status, body) = get_json(seeded_pool().await, "/api/movies?rating_tier=unrated").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 1);
    assert_eq!(body["movies"][0]["title"], "Obscure Short");
}

#[tokio::test]
async fn year_range_filter_is_inclusive() {
    let (status, body) =
        get_json(seeded_pool().await, "/api/movies?year_min=1979&year_max=1997").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 3);
}

#[tokio::test]
async fn filters_combine_as_a_conjunction() {
    let (status, body) = get_json(
        seeded_pool().await,
        "/api/movies?genre_bucket=drama&rating_tier=high&year_min=1990",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 1);
    assert_eq!(body["movies"][0]["title"], "The Shawshank Redemption");
}

#[tokio::test]
async fn unknown_filter_values_are_rejected_not_ignored() {
    let (status, body) = get_json(seeded_pool().await, "/api/movies?genre_bucket=western-noir").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_QUERY");

    let (status, _) = get_json(seeded_pool().await, "/api/movies?rating_tier=superb").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inverted_year_range_is_rejected() {
    let (status, body) =
        get_json(seeded_pool().await, "/api/movies?year_min=2010&year_max=1990").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_QUERY");
}

#[tokio::test]
async fn summary_aggregates_the_collection() {
    let (status, body) = get_json(seeded_pool().await, "/api/stats/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_movies"], 6);
    assert_eq!(body["rated_movies"], 5);
    assert_eq!(body["unknown_genre_movies"], 1);
    // (9.3 + 8.8 + 8.5 + 3.5 + 10.0) / 5 = 8.02
    assert_eq!(body["average_rating"], 8.02);

    let top = body["top_rated"].as_array().unwrap();
    assert_eq!(top[0]["title"], "12 Angry Men");
    assert_eq!(top[0]["rating"], 10.0);
}

#[tokio::test]
async fn genre_distribution_counts_buckets() {
    let (status, body) = get_json(seeded_pool().await, "/api/stats/genres").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    let drama = rows.iter().find(|r| r["label"] == "drama").unwrap();
    assert_eq!(drama["count"], 2);
}

#[tokio::test]
async fn rating_histogram_has_tiers_and_bins() {
    let (status, body) = get_json(seeded_pool().await, "/api/stats/ratings").await;

    assert_eq!(status, StatusCode::OK);
    let tiers = body["tiers"].as_array().unwrap();
    let high = tiers.iter().find(|r| r["label"] == "high").unwrap();
    assert_eq!(high["count"], 4);

    // A perfect 10.0 folds into the top bin
    let bins = body["bins"].as_array().unwrap();
    let top_bin = bins.iter().find(|b| b["bin_start"] == 9).unwrap();
    assert_eq!(top_bin["count"], 2);
    assert!(bins.iter().all(|b| b["bin_start"].as_i64().unwrap() <= 9));
}

#[tokio::test]
async fn year_trend_puts_unknown_last() {
    let (status, body) = get_json(seeded_pool().await, "/api/stats/years").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.last().unwrap()["label"], "Unknown");
    assert_eq!(rows[0]["label"], "1950s");
}

#[tokio::test]
async fn csv_export_serializes_the_filtered_listing() {
    let app = build_router(AppState::new(seeded_pool().await));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/export/movies.csv?genre_bucket=drama")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/csv"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    // Header plus the two drama rows
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().next().unwrap().starts_with("imdb_id,title"));
}

#[tokio::test]
async fn json_export_returns_an_array() {
    let (status, body) = get_json(seeded_pool().await, "/api/export/movies.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn listing_pages_beyond_the_page_size() {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    cinedex_common::db::init::create_schema(&pool).await.unwrap();

    for i in 0..55 {
        seed_movie(
            &pool,
            &format!("tt{:07}", i),
            &format!("Movie {}", i),
            Some(2000),
            Some(7.0),
            "drama",
            "medium",
            "2000s",
        )
        .await;
    }

    let (status, body) = get_json(pool, "/api/movies?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 55);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["movies"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let (status, body) = get_json(seeded_pool().await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["module"], "cinedex-dr");
}
