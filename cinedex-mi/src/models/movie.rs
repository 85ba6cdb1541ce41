//! Movie record and derived classification labels

use cinedex_common::labels::{GenreBucket, RatingTier};
use serde::{Deserialize, Serialize};

/// One normalized title lookup result from the metadata provider.
///
/// `imdb_id` is the provider's stable identifier and the natural key for
/// deduplication: a second lookup of the same title updates the stored row
/// rather than duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Stable identifier assigned by the metadata provider
    pub imdb_id: String,
    /// Display title as reported by the provider
    pub title: String,
    /// Release year, if the provider reported one
    pub year: Option<i32>,
    /// Genre names in provider order
    pub genres: Vec<String>,
    /// Rating on a 0.0-10.0 scale, if rated
    pub rating: Option<f64>,
    /// Runtime in minutes
    pub runtime_minutes: Option<i64>,
    /// Director credit line
    pub director: Option<String>,
    /// Principal cast line
    pub actors: Option<String>,
    /// Short plot synopsis
    pub plot: Option<String>,
    /// Poster image URL
    pub poster_url: Option<String>,
}

/// Labels derived from a MovieRecord by the classifier.
///
/// Purely a function of the record: recomputing from the same record always
/// yields the same labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationLabels {
    pub genre_bucket: GenreBucket,
    pub rating_tier: RatingTier,
    /// Decade label ("1990s") or "Unknown"
    pub era_bucket: String,
}
