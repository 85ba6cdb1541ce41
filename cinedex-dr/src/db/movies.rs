//! Movie listing and filtering queries
//!
//! Filters support genre bucket, rating tier, and year range in any
//! conjunction. Unknown filter values are rejected up front (invalid query),
//! never silently ignored.

use cinedex_common::labels::{GenreBucket, RatingTier};
use cinedex_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Validated movie listing filter
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub genre_bucket: Option<GenreBucket>,
    pub rating_tier: Option<RatingTier>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

impl MovieFilter {
    /// Parse raw query parameters, rejecting unknown bucket/tier values and
    /// inverted year ranges.
    pub fn parse(
        genre_bucket: Option<&str>,
        rating_tier: Option<&str>,
        year_min: Option<i32>,
        year_max: Option<i32>,
    ) -> Result<Self> {
        let genre_bucket = genre_bucket.map(str::parse).transpose()?;
        let rating_tier = rating_tier.map(str::parse).transpose()?;

        if let (Some(min), Some(max)) = (year_min, year_max) {
            if min > max {
                return Err(Error::InvalidInput(format!(
                    "Inverted year range: {} > {}",
                    min, max
                )));
            }
        }

        Ok(Self {
            genre_bucket,
            rating_tier,
            year_min,
            year_max,
        })
    }

    /// SQL conditions in bind order; see `bind_values`
    fn conditions(&self) -> Vec<&'static str> {
        let mut conditions = Vec::new();
        if self.genre_bucket.is_some() {
            conditions.push("genre_bucket = ?");
        }
        if self.rating_tier.is_some() {
            conditions.push("rating_tier = ?");
        }
        if self.year_min.is_some() {
            conditions.push("year >= ?");
        }
        if self.year_max.is_some() {
            conditions.push("year <= ?");
        }
        conditions
    }

    fn where_clause(&self) -> String {
        let conditions = self.conditions();
        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    /// Bind filter values in the same order `conditions` emits placeholders
    fn bind_values<'q>(
        &self,
        mut query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        if let Some(bucket) = self.genre_bucket {
            query = query.bind(bucket.as_str());
        }
        if let Some(tier) = self.rating_tier {
            query = query.bind(tier.as_str());
        }
        if let Some(min) = self.year_min {
            query = query.bind(min);
        }
        if let Some(max) = self.year_max {
            query = query.bind(max);
        }
        query
    }
}

/// One listing row: stored record fields plus derived labels
#[derive(Debug, Clone, Serialize)]
pub struct MovieRow {
    pub imdb_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub runtime_minutes: Option<i64>,
    pub director: Option<String>,
    pub genre_bucket: String,
    pub rating_tier: String,
    pub era_bucket: String,
    pub updated_at: String,
}

/// Count movies matching the filter
pub async fn count_movies(pool: &SqlitePool, filter: &MovieFilter) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM movies{}", filter.where_clause());
    let row = filter.bind_values(sqlx::query(&sql)).fetch_one(pool).await?;
    Ok(row.get(0))
}

/// List movies matching the filter, most recently updated first
pub async fn list_movies(
    pool: &SqlitePool,
    filter: &MovieFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<MovieRow>> {
    let sql = format!(
        "SELECT imdb_id, title, year, genres, rating, runtime_minutes, director,
                genre_bucket, rating_tier, era_bucket, updated_at
         FROM movies{}
         ORDER BY updated_at DESC, imdb_id
         LIMIT ? OFFSET ?",
        filter.where_clause()
    );

    let query = filter.bind_values(sqlx::query(&sql)).bind(limit).bind(offset);
    let rows = query.fetch_all(pool).await?;

    rows.into_iter().map(row_to_movie).collect()
}

/// List every movie matching the filter (export path, no pagination)
pub async fn list_all_movies(pool: &SqlitePool, filter: &MovieFilter) -> Result<Vec<MovieRow>> {
    let sql = format!(
        "SELECT imdb_id, title, year, genres, rating, runtime_minutes, director,
                genre_bucket, rating_tier, era_bucket, updated_at
         FROM movies{}
         ORDER BY updated_at DESC, imdb_id",
        filter.where_clause()
    );

    let query = filter.bind_values(sqlx::query(&sql));
    let rows = query.fetch_all(pool).await?;

    rows.into_iter().map(row_to_movie).collect()
}

fn row_to_movie(row: sqlx::sqlite::SqliteRow) -> Result<MovieRow> {
    let genres_json: String = row.get("genres");
    let genres: Vec<String> = serde_json::from_str(&genres_json)
        .map_err(|e| Error::Internal(format!("Corrupt genres column: {}", e)))?;

    Ok(MovieRow {
        imdb_id: row.get("imdb_id"),
        title: row.get("title"),
        year: row.get("year"),
        genres,
        rating: row.get("rating"),
        runtime_minutes: row.get("runtime_minutes"),
        director: row.get("director"),
        genre_bucket: row.get("genre_bucket"),
        rating_tier: row.get("rating_tier"),
        era_bucket: row.get("era_bucket"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bucket_is_rejected() {
        let err = MovieFilter::parse(Some("western-noir"), None, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let err = MovieFilter::parse(None, Some("superb"), None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let err = MovieFilter::parse(None, None, Some(2010), Some(1990)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn valid_combination_parses() {
        let filter =
            MovieFilter::parse(Some("drama"), Some("high"), Some(1990), Some(1999)).unwrap();
        assert_eq!(filter.genre_bucket, Some(GenreBucket::Drama));
        assert_eq!(filter.rating_tier, Some(RatingTier::High));
        assert_eq!(
            filter.where_clause(),
            " WHERE genre_bucket = ? AND rating_tier = ? AND year >= ? AND year <= ?"
        );
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = MovieFilter::default();
        assert_eq!(filter.where_clause(), "");
    }
}
