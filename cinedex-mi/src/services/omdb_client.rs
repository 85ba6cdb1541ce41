//! OMDb API client
//!
//! Title lookups against the OMDb HTTP API with client-side request pacing.
//! Every call is a live network request; there is deliberately no cache.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use super::MetadataProvider;
use crate::models::MovieRecord;

const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
const USER_AGENT: &str = "cinedex/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const MIN_REQUEST_INTERVAL_MS: u64 = 200;

/// OMDb client errors.
///
/// `InvalidTitle` and `NotFound` are terminal; everything else is transient
/// from the pipeline's perspective and eligible for retry.
#[derive(Debug, Error)]
pub enum OmdbError {
    #[error("Title is empty")]
    InvalidTitle,

    #[error("Title not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl OmdbError {
    /// Whether the pipeline should retry this failure
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OmdbError::Network(_) | OmdbError::RateLimited | OmdbError::Api(..) | OmdbError::Parse(_)
        )
    }
}

/// Raw OMDb title lookup response.
///
/// OMDb reports every field as a string and uses "N/A" for absent values;
/// `Response` is "True"/"False" with an `Error` message on "False".
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbLookupResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

/// Pacer enforcing a minimum interval between outbound requests
struct RequestPacer {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RequestPacer {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the pacing interval
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Request pacing: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// OMDb API client
pub struct OmdbClient {
    http_client: reqwest::Client,
    api_key: String,
    pacer: Arc<RequestPacer>,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Result<Self, OmdbError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OmdbError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            pacer: Arc::new(RequestPacer::new(MIN_REQUEST_INTERVAL_MS)),
        })
    }

    /// Look up a single title.
    ///
    /// Empty titles fail fast without touching the network. Ambiguous
    /// matches are resolved by the provider; its best-ranked candidate is
    /// taken as-is.
    pub async fn lookup_title(&self, title: &str) -> Result<MovieRecord, OmdbError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(OmdbError::InvalidTitle);
        }

        self.pacer.wait().await;

        tracing::debug!(title = %title, "Querying OMDb API");

        let response = self
            .http_client
            .get(OMDB_BASE_URL)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("t", title),
                ("type", "movie"),
                ("plot", "short"),
            ])
            .send()
            .await
            .map_err(|e| OmdbError::Network(e.to_string()))?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(OmdbError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OmdbError::Api(status.as_u16(), error_text));
        }

        let payload: OmdbLookupResponse = response
            .json()
            .await
            .map_err(|e| OmdbError::Parse(e.to_string()))?;

        let record = record_from_response(title, payload)?;

        tracing::info!(
            title = %record.title,
            imdb_id = %record.imdb_id,
            year = ?record.year,
            "Retrieved movie from OMDb"
        );

        Ok(record)
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<MovieRecord, OmdbError> {
        self.lookup_title(title).await
    }
}

/// Normalize a raw OMDb payload into a MovieRecord.
///
/// A `Response: "False"` payload whose error mentions "not found" is the
/// provider affirmatively reporting no match; any other "False" payload
/// (daily limit, key trouble surfaced with 200) counts as a provider fault.
pub fn record_from_response(
    requested_title: &str,
    payload: OmdbLookupResponse,
) -> Result<MovieRecord, OmdbError> {
    if !payload.response.eq_ignore_ascii_case("true") {
        let message = payload.error.unwrap_or_else(|| "unknown error".to_string());
        if message.to_ascii_lowercase().contains("not found") {
            return Err(OmdbError::NotFound(requested_title.to_string()));
        }
        return Err(OmdbError::Api(200, message));
    }

    let imdb_id = opt_field(payload.imdb_id)
        .ok_or_else(|| OmdbError::Parse("missing imdbID in response".to_string()))?;

    let title =
        opt_field(payload.title).unwrap_or_else(|| requested_title.to_string());

    Ok(MovieRecord {
        imdb_id,
        title,
        year: payload.year.as_deref().and_then(parse_year),
        genres: split_genres(payload.genre.as_deref()),
        rating: payload.imdb_rating.as_deref().and_then(parse_rating),
        runtime_minutes: payload.runtime.as_deref().and_then(parse_runtime_minutes),
        director: opt_field(payload.director),
        actors: opt_field(payload.actors),
        plot: opt_field(payload.plot),
        poster_url: opt_field(payload.poster),
    })
}

/// Drop empty and "N/A" string fields
fn opt_field(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "N/A")
}

/// OMDb year strings include ranges for series spill-over ("2010–2014");
/// take the leading 4-digit year.
fn parse_year(raw: &str) -> Option<i32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

/// "8.8" -> Some(8.8); "N/A" -> None
fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|r| (0.0..=10.0).contains(r))
}

/// "148 min" -> Some(148)
fn parse_runtime_minutes(raw: &str) -> Option<i64> {
    raw.trim()
        .split_whitespace()
        .next()
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|m| *m > 0)
}

/// "Action, Adventure, Sci-Fi" -> provider-ordered genre list
fn split_genres(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.trim().is_empty() && s.trim() != "N/A" => s
            .split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}
