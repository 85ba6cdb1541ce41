//! Watchlist persistence
//!
//! Watchlists group stored movies by name. Names are unique; a movie can
//! appear in a watchlist at most once.

use cinedex_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::models::{ClassificationLabels, MovieRecord};

/// Watchlist summary row
#[derive(Debug, Clone, Serialize)]
pub struct Watchlist {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub movie_count: i64,
}

/// Raised as InvalidInput so callers can distinguish user mistakes
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::ForeignKeyViolation
    )
}

/// Create a watchlist; duplicate names are an InvalidInput error
pub async fn create_watchlist(pool: &SqlitePool, name: &str, description: &str) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Watchlist name is empty".to_string()));
    }

    let result = sqlx::query("INSERT INTO watchlists (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(description)
        .execute(pool)
        .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(Error::InvalidInput(format!(
            "Watchlist already exists: {}",
            name
        ))),
        Err(e) => Err(e.into()),
    }
}

/// List all watchlists with their movie counts, newest first
pub async fn list_watchlists(pool: &SqlitePool) -> Result<Vec<Watchlist>> {
    let rows = sqlx::query(
        r#"
        SELECT w.id, w.name, w.description, w.created_at, COUNT(wi.id) AS movie_count
        FROM watchlists w
        LEFT JOIN watchlist_items wi ON w.id = wi.watchlist_id
        GROUP BY w.id
        ORDER BY w.created_at DESC, w.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Watchlist {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            movie_count: row.get("movie_count"),
        })
        .collect())
}

/// Add a stored movie to a watchlist.
///
/// Unknown watchlist or movie surfaces as NotFound; a movie already on the
/// list is an InvalidInput error.
pub async fn add_movie_to_watchlist(
    pool: &SqlitePool,
    watchlist_id: i64,
    imdb_id: &str,
) -> Result<()> {
    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watchlists WHERE id = ?")
        .bind(watchlist_id)
        .fetch_one(pool)
        .await?;
    if exists == 0 {
        return Err(Error::NotFound(format!("Watchlist {}", watchlist_id)));
    }

    let result = sqlx::query("INSERT INTO watchlist_items (watchlist_id, imdb_id) VALUES (?, ?)")
        .bind(watchlist_id)
        .bind(imdb_id)
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(Error::InvalidInput(format!(
            "Movie {} is already on the watchlist",
            imdb_id
        ))),
        Err(e) if is_foreign_key_violation(&e) => {
            Err(Error::NotFound(format!("Movie {}", imdb_id)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Movies on a watchlist, most recently added first
pub async fn watchlist_movies(
    pool: &SqlitePool,
    watchlist_id: i64,
) -> Result<Vec<(MovieRecord, ClassificationLabels)>> {
    let rows = sqlx::query(
        r#"
        SELECT m.imdb_id, m.title, m.year, m.genres, m.rating, m.runtime_minutes,
               m.director, m.actors, m.plot, m.poster_url,
               m.genre_bucket, m.rating_tier, m.era_bucket
        FROM movies m
        JOIN watchlist_items wi ON m.imdb_id = wi.imdb_id
        WHERE wi.watchlist_id = ?
        ORDER BY wi.added_at DESC, wi.id DESC
        "#,
    )
    .bind(watchlist_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(super::movies::movie_from_row).collect()
}

/// Delete a watchlist; items cascade
pub async fn delete_watchlist(pool: &SqlitePool, watchlist_id: i64) -> Result<()> {
    let done = sqlx::query("DELETE FROM watchlists WHERE id = ?")
        .bind(watchlist_id)
        .execute(pool)
        .await?;

    if done.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Watchlist {}", watchlist_id)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::movies::upsert_movie;
    use crate::services::classifier::classify;

    async fn test_pool() -> SqlitePool {
        // One connection only: pooled in-memory connections are separate dbs
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await.unwrap();
        cinedex_common::db::init::create_schema(&pool).await.unwrap();
        pool
    }

    async fn seed_movie(pool: &SqlitePool, imdb_id: &str, title: &str) {
        let record = MovieRecord {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: Some(2010),
            genres: vec!["Drama".to_string()],
            rating: Some(7.0),
            runtime_minutes: None,
            director: None,
            actors: None,
            plot: None,
            poster_url: None,
        };
        let labels = classify(&record);
        upsert_movie(pool, &record, &labels).await.unwrap();
    }

    #[tokio::test]
    async fn create_add_list_delete_flow() {
        let pool = test_pool().await;
        seed_movie(&pool, "tt0001", "First").await;

        let id = create_watchlist(&pool, "favorites", "the good ones").await.unwrap();
        add_movie_to_watchlist(&pool, id, "tt0001").await.unwrap();

        let lists = list_watchlists(&pool).await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].movie_count, 1);

        let movies = watchlist_movies(&pool, id).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].0.title, "First");

        delete_watchlist(&pool, id).await.unwrap();
        assert!(list_watchlists(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_name_is_invalid_input() {
        let pool = test_pool().await;
        create_watchlist(&pool, "favorites", "").await.unwrap();
        let err = create_watchlist(&pool, "favorites", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn duplicate_membership_is_invalid_input() {
        let pool = test_pool().await;
        seed_movie(&pool, "tt0001", "First").await;
        let id = create_watchlist(&pool, "favorites", "").await.unwrap();

        add_movie_to_watchlist(&pool, id, "tt0001").await.unwrap();
        let err = add_movie_to_watchlist(&pool, id, "tt0001").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_movie_is_not_found() {
        let pool = test_pool().await;
        let id = create_watchlist(&pool, "favorites", "").await.unwrap();
        let err = add_movie_to_watchlist(&pool, id, "tt9999").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_missing_watchlist_is_not_found() {
        let pool = test_pool().await;
        let err = delete_watchlist(&pool, 42).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
