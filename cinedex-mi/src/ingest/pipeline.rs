//! Ingest pipeline
//!
//! Drives each requested title through lookup -> classify -> store, one
//! title at a time in input order; the full chain runs to completion (or
//! failure) before the next title starts. One title's failure never aborts
//! the batch. The single exception is the store becoming unavailable: a run
//! of consecutive storage failures ends the session with one aggregated
//! error instead of failing every remaining title individually.

use sqlx::SqlitePool;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::db;
use crate::models::{
    ClassificationLabels, FailureReason, IngestSession, IngestState, MovieRecord,
};
use crate::services::{classifier, MetadataProvider, OmdbError};

/// Additional lookup attempts allowed after the first transient failure
const RETRY_BUDGET: u32 = 2;

/// Pause between lookup attempts
const RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Consecutive storage failures that abort the remaining batch
const STORAGE_FAILURE_LIMIT: u32 = 3;

/// Process every title in the session, persisting progress after each one.
///
/// Cancellation is honored between titles: the in-flight title finishes (or
/// fails) before the session ends CANCELLED.
pub async fn run_ingest<P: MetadataProvider>(
    pool: &SqlitePool,
    provider: &P,
    mut session: IngestSession,
    titles: Vec<String>,
    cancel: CancellationToken,
) -> cinedex_common::Result<IngestSession> {
    tracing::info!(
        session_id = %session.session_id,
        total = titles.len(),
        "Ingest session started"
    );

    let mut consecutive_storage_failures: u32 = 0;

    for (index, title) in titles.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(session_id = %session.session_id, "Ingest session cancelled");
            session.update_progress(index, "Cancelled".to_string());
            session.transition_to(IngestState::Cancelled);
            db::sessions::save_session(pool, &session).await?;
            return Ok(session);
        }

        session.update_progress(index, format!("Processing \"{}\"", title));
        db::sessions::save_session(pool, &session).await?;

        match process_title(pool, provider, title).await {
            Ok((record, labels)) => {
                consecutive_storage_failures = 0;
                session.record_success(record, labels);
            }
            Err(reason) => {
                if reason == FailureReason::StorageError {
                    consecutive_storage_failures += 1;
                } else {
                    consecutive_storage_failures = 0;
                }

                tracing::warn!(
                    session_id = %session.session_id,
                    title = %title,
                    reason = ?reason,
                    "Title failed"
                );
                session.record_failure(title.clone(), reason);

                if consecutive_storage_failures >= STORAGE_FAILURE_LIMIT {
                    let remaining = titles.len() - (index + 1);
                    tracing::error!(
                        session_id = %session.session_id,
                        remaining,
                        "Store unavailable, aborting ingest session"
                    );
                    session.update_progress(index + 1, "Aborted".to_string());
                    session.error = Some(format!(
                        "Store unavailable: {} consecutive storage failures; {} titles not processed",
                        consecutive_storage_failures, remaining
                    ));
                    session.transition_to(IngestState::Failed);
                    db::sessions::save_session(pool, &session).await?;
                    return Ok(session);
                }
            }
        }

        session.update_progress(index + 1, format!("Finished \"{}\"", title));
        db::sessions::save_session(pool, &session).await?;
    }

    session.update_progress(titles.len(), "Completed".to_string());
    session.transition_to(IngestState::Completed);
    db::sessions::save_session(pool, &session).await?;

    tracing::info!(
        session_id = %session.session_id,
        succeeded = session.succeeded.len(),
        failed = session.failed.len(),
        "Ingest session completed"
    );

    Ok(session)
}

/// Run one title through the full chain
async fn process_title<P: MetadataProvider>(
    pool: &SqlitePool,
    provider: &P,
    title: &str,
) -> Result<(MovieRecord, ClassificationLabels), FailureReason> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(FailureReason::InvalidInput);
    }

    let record = lookup_with_retry(provider, trimmed).await?;
    let labels = classifier::classify(&record);

    match db::movies::upsert_movie(pool, &record, &labels).await {
        Ok(()) => Ok((record, labels)),
        Err(e) => {
            tracing::error!(title = %trimmed, error = %e, "Storage failure");
            Err(FailureReason::StorageError)
        }
    }
}

/// Look up a title, retrying transient provider failures up to the budget
async fn lookup_with_retry<P: MetadataProvider>(
    provider: &P,
    title: &str,
) -> Result<MovieRecord, FailureReason> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match provider.lookup(title).await {
            Ok(record) => return Ok(record),
            Err(OmdbError::InvalidTitle) => return Err(FailureReason::InvalidInput),
            Err(OmdbError::NotFound(_)) => return Err(FailureReason::NotFound),
            Err(e) if e.is_transient() && attempt <= RETRY_BUDGET => {
                tracing::warn!(
                    title = %title,
                    attempt,
                    error = %e,
                    "Transient lookup failure, retrying"
                );
                tokio::time::sleep(RETRY_PAUSE).await;
            }
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    attempts = attempt,
                    error = %e,
                    "Lookup retry budget exhausted"
                );
                return Err(FailureReason::TransientError);
            }
        }
    }
}
