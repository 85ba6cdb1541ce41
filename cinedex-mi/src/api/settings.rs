//! Settings API endpoints
//!
//! GET/POST for the OMDb API key. The database write is authoritative; the
//! TOML sync is a best-effort backup and never fails the request.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::OmdbClient;
use crate::AppState;

/// Request payload for setting the OMDb API key
#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

/// Response payload for API key configuration
#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub success: bool,
    pub message: String,
}

/// GET response: whether a key is configured (the key itself is never echoed)
#[derive(Debug, Serialize)]
pub struct ApiKeyStatusResponse {
    pub configured: bool,
}

/// GET /api/settings/omdb_api_key
pub async fn get_api_key_status(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiKeyStatusResponse>> {
    let key = crate::db::settings::get_omdb_api_key(&state.db).await?;
    Ok(Json(ApiKeyStatusResponse {
        configured: key.map(|k| crate::config::is_valid_key(&k)).unwrap_or(false),
    }))
}

/// POST /api/settings/omdb_api_key
///
/// 1. Validate key (non-empty, non-whitespace)
/// 2. Write to database (authoritative)
/// 3. Sync to TOML (best-effort backup)
/// 4. Swap the live client so the new key takes effect immediately
pub async fn set_api_key(
    State(state): State<AppState>,
    Json(payload): Json<SetApiKeyRequest>,
) -> ApiResult<Json<SetApiKeyResponse>> {
    if !crate::config::is_valid_key(&payload.api_key) {
        return Err(ApiError::BadRequest(
            "API key cannot be empty or whitespace-only".to_string(),
        ));
    }

    let key = payload.api_key.trim().to_string();

    crate::db::settings::set_omdb_api_key(&state.db, key.clone())
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save API key to database: {}", e)))?;

    info!("OMDb API key configured via API");

    let toml_path = cinedex_common::config::toml_config_path("cinedex-mi");
    // Best-effort; logs its own warning on failure
    let _ = crate::config::sync_key_to_toml(&key, &toml_path);

    let client = OmdbClient::new(key)
        .map_err(|e| ApiError::Internal(format!("Failed to build OMDb client: {}", e)))?;
    state.replace_metadata_client(client).await;

    Ok(Json(SetApiKeyResponse {
        success: true,
        message: "OMDb API key saved".to_string(),
    }))
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/api/settings/omdb_api_key",
        get(get_api_key_status).post(set_api_key),
    )
}
