//! Data models for cinedex-mi

pub mod ingest_session;
pub mod movie;

pub use ingest_session::{
    BatchResult, FailedTitle, FailureReason, IngestProgress, IngestSession, IngestState,
    IngestedMovie,
};
pub use movie::{ClassificationLabels, MovieRecord};
