//! Movie persistence
//!
//! The `movies` table is keyed by the provider's imdb_id; upsert updates the
//! existing row in place, so re-ingesting a title never duplicates it.

use cinedex_common::labels::{GenreBucket, RatingTier};
use cinedex_common::{Error, Result};
use sqlx::{Row, SqlitePool};

use crate::models::{ClassificationLabels, MovieRecord};

/// Insert or update a movie row. Idempotent on imdb_id.
pub async fn upsert_movie(
    pool: &SqlitePool,
    record: &MovieRecord,
    labels: &ClassificationLabels,
) -> Result<()> {
    let genres = serde_json::to_string(&record.genres)
        .map_err(|e| Error::Internal(format!("Failed to serialize genres: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO movies (
            imdb_id, title, year, genres, rating, runtime_minutes,
            director, actors, plot, poster_url,
            genre_bucket, rating_tier, era_bucket,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(imdb_id) DO UPDATE SET
            title = excluded.title,
            year = excluded.year,
            genres = excluded.genres,
            rating = excluded.rating,
            runtime_minutes = excluded.runtime_minutes,
            director = excluded.director,
            actors = excluded.actors,
            plot = excluded.plot,
            poster_url = excluded.poster_url,
            genre_bucket = excluded.genre_bucket,
            rating_tier = excluded.rating_tier,
            era_bucket = excluded.era_bucket,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&record.imdb_id)
    .bind(&record.title)
    .bind(record.year)
    .bind(&genres)
    .bind(record.rating)
    .bind(record.runtime_minutes)
    .bind(&record.director)
    .bind(&record.actors)
    .bind(&record.plot)
    .bind(&record.poster_url)
    .bind(labels.genre_bucket.as_str())
    .bind(labels.rating_tier.as_str())
    .bind(&labels.era_bucket)
    .execute(pool)
    .await?;

    Ok(())
}

/// Check whether a movie row exists for this imdb_id
pub async fn movie_exists(pool: &SqlitePool, imdb_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE imdb_id = ?")
        .bind(imdb_id)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// Load a movie row with its labels
pub async fn load_movie(
    pool: &SqlitePool,
    imdb_id: &str,
) -> Result<Option<(MovieRecord, ClassificationLabels)>> {
    let row = sqlx::query(
        r#"
        SELECT imdb_id, title, year, genres, rating, runtime_minutes,
               director, actors, plot, poster_url,
               genre_bucket, rating_tier, era_bucket
        FROM movies
        WHERE imdb_id = ?
        "#,
    )
    .bind(imdb_id)
    .fetch_optional(pool)
    .await?;

    row.map(movie_from_row).transpose()
}

/// Rebuild (MovieRecord, ClassificationLabels) from a movies row
pub fn movie_from_row(
    row: sqlx::sqlite::SqliteRow,
) -> Result<(MovieRecord, ClassificationLabels)> {
    let genres_json: String = row.get("genres");
    let genres: Vec<String> = serde_json::from_str(&genres_json)
        .map_err(|e| Error::Internal(format!("Corrupt genres column: {}", e)))?;

    let genre_bucket: GenreBucket = row.get::<String, _>("genre_bucket").parse()?;
    let rating_tier: RatingTier = row.get::<String, _>("rating_tier").parse()?;

    let record = MovieRecord {
        imdb_id: row.get("imdb_id"),
        title: row.get("title"),
        year: row.get("year"),
        genres,
        rating: row.get("rating"),
        runtime_minutes: row.get("runtime_minutes"),
        director: row.get("director"),
        actors: row.get("actors"),
        plot: row.get("plot"),
        poster_url: row.get("poster_url"),
    };

    let labels = ClassificationLabels {
        genre_bucket,
        rating_tier,
        era_bucket: row.get("era_bucket"),
    };

    Ok((record, labels))
}
