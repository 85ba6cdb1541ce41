//! Aggregate statistics queries
//!
//! Everything here is a straight GROUP BY over the movies table; the
//! review UI turns these into charts.

use cinedex_common::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Collection-wide summary numbers
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_movies: i64,
    pub rated_movies: i64,
    /// Mean rating over rated movies, rounded to 2 decimals
    pub average_rating: Option<f64>,
    /// Movies with no usable genre information
    pub unknown_genre_movies: i64,
    pub top_rated: Vec<TopRatedMovie>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopRatedMovie {
    pub imdb_id: String,
    pub title: String,
    pub rating: f64,
}

/// One labelled count (genre distribution, decade trend, tier histogram)
#[derive(Debug, Clone, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// One-point rating bin (4 -> ratings in [4.0, 5.0))
#[derive(Debug, Clone, Serialize)]
pub struct RatingBin {
    pub bin_start: i64,
    pub count: i64,
}

/// Rating histogram: fixed tiers plus 1-point bins
#[derive(Debug, Clone, Serialize)]
pub struct RatingHistogram {
    pub tiers: Vec<LabelCount>,
    pub bins: Vec<RatingBin>,
}

const TOP_RATED_LIMIT: i64 = 5;

/// Collection summary
pub async fn summary(pool: &SqlitePool) -> Result<Summary> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(rating) AS rated,
               AVG(rating) AS average,
               SUM(CASE WHEN genre_bucket = 'unknown' THEN 1 ELSE 0 END) AS unknown_genre
        FROM movies
        "#,
    )
    .fetch_one(pool)
    .await?;

    let average: Option<f64> = row.get("average");

    let top_rows = sqlx::query(
        r#"
        SELECT imdb_id, title, rating
        FROM movies
        WHERE rating IS NOT NULL
        ORDER BY rating DESC, title
        LIMIT ?
        "#,
    )
    .bind(TOP_RATED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(Summary {
        total_movies: row.get("total"),
        rated_movies: row.get("rated"),
        average_rating: average.map(|a| (a * 100.0).round() / 100.0),
        unknown_genre_movies: row.get::<Option<i64>, _>("unknown_genre").unwrap_or(0),
        top_rated: top_rows
            .into_iter()
            .map(|r| TopRatedMovie {
                imdb_id: r.get("imdb_id"),
                title: r.get("title"),
                rating: r.get("rating"),
            })
            .collect(),
    })
}

/// Movies per genre bucket, largest first
pub async fn genre_distribution(pool: &SqlitePool) -> Result<Vec<LabelCount>> {
    let rows = sqlx::query(
        r#"
        SELECT genre_bucket, COUNT(*) AS count
        FROM movies
        GROUP BY genre_bucket
        ORDER BY count DESC, genre_bucket
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| LabelCount {
            label: r.get("genre_bucket"),
            count: r.get("count"),
        })
        .collect())
}

/// Rating histogram over fixed tiers plus 1-point bins.
///
/// A perfect 10.0 lands in the top bin (9) rather than a bin of its own.
pub async fn rating_histogram(pool: &SqlitePool) -> Result<RatingHistogram> {
    let tier_rows = sqlx::query(
        r#"
        SELECT rating_tier, COUNT(*) AS count
        FROM movies
        GROUP BY rating_tier
        ORDER BY count DESC, rating_tier
        "#,
    )
    .fetch_all(pool)
    .await?;

    let bin_rows = sqlx::query(
        r#"
        SELECT MIN(CAST(rating AS INTEGER), 9) AS bin_start, COUNT(*) AS count
        FROM movies
        WHERE rating IS NOT NULL
        GROUP BY bin_start
        ORDER BY bin_start
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(RatingHistogram {
        tiers: tier_rows
            .into_iter()
            .map(|r| LabelCount {
                label: r.get("rating_tier"),
                count: r.get("count"),
            })
            .collect(),
        bins: bin_rows
            .into_iter()
            .map(|r| RatingBin {
                bin_start: r.get("bin_start"),
                count: r.get("count"),
            })
            .collect(),
    })
}

/// Movies per era bucket, oldest decade first, "Unknown" last
pub async fn year_trend(pool: &SqlitePool) -> Result<Vec<LabelCount>> {
    let rows = sqlx::query(
        r#"
        SELECT era_bucket, COUNT(*) AS count
        FROM movies
        GROUP BY era_bucket
        ORDER BY (era_bucket = 'Unknown'), era_bucket
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| LabelCount {
            label: r.get("era_bucket"),
            count: r.get("count"),
        })
        .collect())
}
