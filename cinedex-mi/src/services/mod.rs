//! Service components for cinedex-mi

pub mod classifier;
pub mod omdb_client;
pub mod title_list;

pub use omdb_client::{OmdbClient, OmdbError};

use crate::models::MovieRecord;
use async_trait::async_trait;

/// Metadata lookup seam.
///
/// The ingest pipeline is written against this trait so tests can drive it
/// without network access; `OmdbClient` is the production implementation.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn lookup(&self, title: &str) -> Result<MovieRecord, OmdbError>;
}
