//! Batch ingest API handlers
//!
//! POST /api/ingest/start accepts newline-separated manual entry, POST
//! /api/ingest/upload accepts a delimited file; both spawn the same
//! background pipeline. Progress is polled via /status, the final outcome
//! via /result.

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::ingest::run_ingest;
use crate::models::{BatchResult, IngestProgress, IngestSession, IngestState};
use crate::services::title_list;
use crate::AppState;

/// POST /api/ingest/start request
#[derive(Debug, Deserialize)]
pub struct StartIngestRequest {
    /// Newline-separated titles (manual entry)
    pub titles: String,
}

/// Response for both start endpoints
#[derive(Debug, Serialize)]
pub struct StartIngestResponse {
    pub session_id: Uuid,
    pub state: IngestState,
    pub total_titles: usize,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

/// GET /api/ingest/status response
#[derive(Debug, Serialize)]
pub struct IngestStatusResponse {
    pub session_id: Uuid,
    pub state: IngestState,
    pub progress: IngestProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// GET /api/ingest/result response
#[derive(Debug, Serialize)]
pub struct IngestResultResponse {
    pub session_id: Uuid,
    pub state: IngestState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub result: BatchResult,
}

/// POST /api/ingest/cancel response
#[derive(Debug, Serialize)]
pub struct CancelIngestResponse {
    pub session_id: Uuid,
    pub message: String,
}

/// POST /api/ingest/start
///
/// Begin an ingest session from manual entry. One session runs at a time.
pub async fn start_ingest(
    State(state): State<AppState>,
    Json(request): Json<StartIngestRequest>,
) -> ApiResult<Json<StartIngestResponse>> {
    let titles = title_list::titles_from_text(&request.titles);
    launch_session(state, titles).await
}

/// POST /api/ingest/upload
///
/// Begin an ingest session from an uploaded delimited file.
pub async fn upload_ingest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<StartIngestResponse>> {
    let mut titles: Option<Vec<String>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?;
            titles = Some(title_list::titles_from_upload(&bytes));
        }
    }

    let titles =
        titles.ok_or_else(|| ApiError::BadRequest("Missing 'file' field in upload".to_string()))?;
    launch_session(state, titles).await
}

/// Common session launch path: persist the session, then run the pipeline in
/// a background task so the caller can poll for progress.
async fn launch_session(
    state: AppState,
    titles: Vec<String>,
) -> ApiResult<Json<StartIngestResponse>> {
    if titles.is_empty() {
        return Err(ApiError::BadRequest("No titles to ingest".to_string()));
    }

    // One running session at a time (409 Conflict)
    if crate::db::sessions::has_running_session(&state.db).await? {
        return Err(ApiError::Conflict(
            "Ingest session already running".to_string(),
        ));
    }

    // A provider client must be configured before work is accepted
    let client = state.metadata_client().await?;

    let session = IngestSession::new(titles.len());
    let response = StartIngestResponse {
        session_id: session.session_id,
        state: session.state,
        total_titles: titles.len(),
        started_at: session.started_at,
    };

    crate::db::sessions::save_session(&state.db, &session).await?;

    let cancel = CancellationToken::new();
    state
        .cancellation_tokens
        .write()
        .await
        .insert(session.session_id, cancel.clone());

    tracing::info!(
        session_id = %session.session_id,
        total = titles.len(),
        "Ingest session started"
    );

    let task_state = state.clone();
    let session_id = session.session_id;
    tokio::spawn(async move {
        let outcome = run_ingest(&task_state.db, client.as_ref(), session, titles, cancel).await;

        if let Err(e) = outcome {
            tracing::error!(
                session_id = %session_id,
                error = %e,
                "Ingest background task failed"
            );
            task_state.record_error(e.to_string()).await;
        }

        task_state.cancellation_tokens.write().await.remove(&session_id);
    });

    Ok(Json(response))
}

/// GET /api/ingest/status/{session_id}
pub async fn ingest_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<IngestStatusResponse>> {
    let session = crate::db::sessions::load_session(&state.db, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;

    Ok(Json(IngestStatusResponse {
        session_id: session.session_id,
        state: session.state,
        progress: session.progress,
        error: session.error,
        started_at: session.started_at,
        ended_at: session.ended_at,
    }))
}

/// GET /api/ingest/result/{session_id}
///
/// The aggregated BatchResult; only available once the session is terminal.
pub async fn ingest_result(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<IngestResultResponse>> {
    let session = crate::db::sessions::load_session(&state.db, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;

    if !session.is_terminal() {
        return Err(ApiError::Conflict(format!(
            "Session {} is still running",
            session_id
        )));
    }

    Ok(Json(IngestResultResponse {
        session_id: session.session_id,
        state: session.state,
        error: session.error.clone(),
        result: session.batch_result(),
    }))
}

/// POST /api/ingest/cancel/{session_id}
///
/// Requests cancellation; the in-flight title finishes first.
pub async fn cancel_ingest(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<CancelIngestResponse>> {
    let tokens = state.cancellation_tokens.read().await;

    let Some(token) = tokens.get(&session_id) else {
        // Not active: distinguish finished sessions from unknown ids
        drop(tokens);
        let session = crate::db::sessions::load_session(&state.db, session_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;
        return Err(ApiError::Conflict(format!(
            "Session {} already ended ({:?})",
            session_id, session.state
        )));
    };

    token.cancel();
    tracing::info!(session_id = %session_id, "Ingest cancellation requested");

    Ok(Json(CancelIngestResponse {
        session_id,
        message: "Cancellation requested; the current title will finish first".to_string(),
    }))
}

/// Build ingest routes
pub fn ingest_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ingest/start", post(start_ingest))
        .route("/api/ingest/upload", post(upload_ingest))
        .route("/api/ingest/status/:session_id", get(ingest_status))
        .route("/api/ingest/result/:session_id", get(ingest_result))
        .route("/api/ingest/cancel/:session_id", post(cancel_ingest))
}
