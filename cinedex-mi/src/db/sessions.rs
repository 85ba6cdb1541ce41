//! Ingest session persistence
//!
//! Sessions are written after every processed title so status polling and
//! service restarts see current progress.

use chrono::{DateTime, Utc};
use cinedex_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{FailedTitle, IngestProgress, IngestSession, IngestState, IngestedMovie};

/// Save or update an ingest session row
pub async fn save_session(pool: &SqlitePool, session: &IngestSession) -> Result<()> {
    let state = serde_json::to_string(&session.state)
        .map_err(|e| Error::Internal(format!("Failed to serialize state: {}", e)))?;
    let succeeded = serde_json::to_string(&session.succeeded)
        .map_err(|e| Error::Internal(format!("Failed to serialize outcomes: {}", e)))?;
    let failed = serde_json::to_string(&session.failed)
        .map_err(|e| Error::Internal(format!("Failed to serialize outcomes: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO ingest_sessions (
            session_id, state,
            progress_current, progress_total, progress_percentage, current_operation,
            succeeded, failed, error, started_at, ended_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(session_id) DO UPDATE SET
            state = excluded.state,
            progress_current = excluded.progress_current,
            progress_total = excluded.progress_total,
            progress_percentage = excluded.progress_percentage,
            current_operation = excluded.current_operation,
            succeeded = excluded.succeeded,
            failed = excluded.failed,
            error = excluded.error,
            ended_at = excluded.ended_at
        "#,
    )
    .bind(session.session_id.to_string())
    .bind(&state)
    .bind(session.progress.current as i64)
    .bind(session.progress.total as i64)
    .bind(session.progress.percentage)
    .bind(&session.progress.current_operation)
    .bind(&succeeded)
    .bind(&failed)
    .bind(&session.error)
    .bind(session.started_at.to_rfc3339())
    .bind(session.ended_at.map(|dt| dt.to_rfc3339()))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load an ingest session by id
pub async fn load_session(pool: &SqlitePool, session_id: Uuid) -> Result<Option<IngestSession>> {
    let row = sqlx::query(
        r#"
        SELECT session_id, state,
               progress_current, progress_total, progress_percentage, current_operation,
               succeeded, failed, error, started_at, ended_at
        FROM ingest_sessions
        WHERE session_id = ?
        "#,
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let state: IngestState = serde_json::from_str(&row.get::<String, _>("state"))
        .map_err(|e| Error::Internal(format!("Corrupt session state: {}", e)))?;
    let succeeded: Vec<IngestedMovie> = serde_json::from_str(&row.get::<String, _>("succeeded"))
        .map_err(|e| Error::Internal(format!("Corrupt session outcomes: {}", e)))?;
    let failed: Vec<FailedTitle> = serde_json::from_str(&row.get::<String, _>("failed"))
        .map_err(|e| Error::Internal(format!("Corrupt session outcomes: {}", e)))?;

    let started_at = parse_timestamp(&row.get::<String, _>("started_at"))?;
    let ended_at = row
        .get::<Option<String>, _>("ended_at")
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    Ok(Some(IngestSession {
        session_id,
        state,
        progress: IngestProgress {
            current: row.get::<i64, _>("progress_current") as usize,
            total: row.get::<i64, _>("progress_total") as usize,
            percentage: row.get("progress_percentage"),
            current_operation: row.get("current_operation"),
        },
        succeeded,
        failed,
        error: row.get("error"),
        started_at,
        ended_at,
    }))
}

/// Check whether any session is still running
pub async fn has_running_session(pool: &SqlitePool) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM ingest_sessions
        WHERE state NOT IN ('"COMPLETED"', '"CANCELLED"', '"FAILED"')
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Corrupt session timestamp: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureReason;

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
    async fn save_and_load_session_round_trips() {
        let pool = test_pool().await;

        let mut session = IngestSession::new(2);
        session.record_failure("".to_string(), FailureReason::InvalidInput);
        session.update_progress(1, "Looking up Alien".to_string());
        save_session(&pool, &session).await.unwrap();

        let loaded = load_session(&pool, session.session_id)
            .await
            .unwrap()
            .expect("session not found");
        assert_eq!(loaded.state, IngestState::Running);
        assert_eq!(loaded.progress.current, 1);
        assert_eq!(loaded.progress.total, 2);
        assert_eq!(loaded.failed.len(), 1);
        assert_eq!(loaded.failed[0].reason, FailureReason::InvalidInput);
    }

    #[tokio::test]
    async fn running_session_detection() {
        let pool = test_pool().await;
        assert!(!has_running_session(&pool).await.unwrap());

        let mut session = IngestSession::new(1);
        save_session(&pool, &session).await.unwrap();
        assert!(has_running_session(&pool).await.unwrap());

        session.transition_to(IngestState::Completed);
        save_session(&pool, &session).await.unwrap();
        assert!(!has_running_session(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn missing_session_is_none() {
        let pool = test_pool().await;
        let loaded = load_session(&pool, Uuid::new_v4()).await.unwrap();
        assert!(loaded.is_none());
    }
}
