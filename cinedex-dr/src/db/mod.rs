//! Database access layer for cinedex-dr
//!
//! All connections are read-only; cinedex-mi is the only writer.

pub mod movies;
pub mod stats;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

/// Connect to the shared database in read-only mode.
///
/// Safety: uses SQLite mode=ro so no query issued by this service can write.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}\nPlease run cinedex-mi first to initialize the database.",
            db_path.display()
        );
    }

    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to database in read-only mode")?;

    // Verify read-only by attempting a write (should fail)
    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            panic!("SAFETY VIOLATION: Database connection is not read-only!");
        }
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn readonly_connection_rejects_writes() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("cinedex.db");

        // Create the database with the writer-side initializer first
        let writer = cinedex_common::db::init_database(&db_path).await.unwrap();
        writer.close().await;

        let pool = connect_readonly(&db_path)
            .await
            .expect("Should connect in read-only mode");

        let result = sqlx::query("INSERT INTO settings (key, value) VALUES ('k', 'v')")
            .execute(&pool)
            .await;
        assert!(result.is_err(), "Write should fail in read-only mode");
    }

    #[tokio::test]
    async fn missing_database_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = connect_readonly(&dir.path().join("absent.db")).await;
        assert!(result.is_err());
    }
}
