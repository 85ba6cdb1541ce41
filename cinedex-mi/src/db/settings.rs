//! Settings database operations
//!
//! Key/value accessors for the `settings` table. The database copy of the
//! OMDb API key is authoritative; env/TOML values migrate here on startup.

use cinedex_common::{Error, Result};
use sqlx::{Pool, Sqlite};

const OMDB_API_KEY: &str = "omdb_api_key";

/// Get OMDb API key from database, None if not set
pub async fn get_omdb_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, OMDB_API_KEY).await
}

/// Set OMDb API key in database
pub async fn set_omdb_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, OMDB_API_KEY, key).await
}

/// Get a typed setting value
pub async fn get_setting<T: std::str::FromStr>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Internal(format!("Setting '{}' has an invalid value", key))),
    }
}

/// Set a setting value
pub async fn set_setting<T: ToString>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        // One connection only: pooled in-memory connections are separate dbs
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        cinedex_common::db::init::create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn api_key_round_trips() {
        let pool = test_pool().await;
        assert!(get_omdb_api_key(&pool).await.unwrap().is_none());

        set_omdb_api_key(&pool, "4bcd5aba".to_string()).await.unwrap();
        assert_eq!(
            get_omdb_api_key(&pool).await.unwrap().as_deref(),
            Some("4bcd5aba")
        );

        // Overwrite replaces rather than duplicating
        set_omdb_api_key(&pool, "feedbeef".to_string()).await.unwrap();
        assert_eq!(
            get_omdb_api_key(&pool).await.unwrap().as_deref(),
            Some("feedbeef")
        );
    }

    #[tokio::test]
    async fn typed_settings_parse() {
        let pool = test_pool().await;
        set_setting(&pool, "retry_budget", 2i64).await.unwrap();
        let loaded: Option<i64> = get_setting(&pool, "retry_budget").await.unwrap();
        assert_eq!(loaded, Some(2));
    }
}
