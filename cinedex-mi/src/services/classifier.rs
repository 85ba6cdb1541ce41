//! Movie classification
//!
//! Derives categorical labels from a MovieRecord. Pure functions over static
//! rule tables: no I/O, no hidden state, so recomputing from the same record
//! always yields the same labels.

use cinedex_common::labels::{era_bucket, GenreBucket, RatingTier};

use crate::models::{ClassificationLabels, MovieRecord};

/// Provider genre name -> bucket mapping. Matched case-insensitively against
/// the first genre in provider order; unmapped genres fall through to Other.
const GENRE_BUCKETS: &[(&str, GenreBucket)] = &[
    ("action", GenreBucket::Action),
    ("adventure", GenreBucket::Action),
    ("war", GenreBucket::Action),
    ("western", GenreBucket::Action),
    ("comedy", GenreBucket::Comedy),
    ("music", GenreBucket::Comedy),
    ("musical", GenreBucket::Comedy),
    ("drama", GenreBucket::Drama),
    ("romance", GenreBucket::Drama),
    ("history", GenreBucket::Drama),
    ("biography", GenreBucket::Drama),
    ("sci-fi", GenreBucket::SciFiFantasy),
    ("science fiction", GenreBucket::SciFiFantasy),
    ("fantasy", GenreBucket::SciFiFantasy),
    ("thriller", GenreBucket::Thriller),
    ("mystery", GenreBucket::Thriller),
    ("crime", GenreBucket::Thriller),
    ("horror", GenreBucket::Thriller),
    ("film-noir", GenreBucket::Thriller),
    ("animation", GenreBucket::Family),
    ("family", GenreBucket::Family),
    ("documentary", GenreBucket::Documentary),
];

/// Classify a movie record into derived labels
pub fn classify(record: &MovieRecord) -> ClassificationLabels {
    ClassificationLabels {
        genre_bucket: genre_bucket(&record.genres),
        rating_tier: rating_tier(record.rating),
        era_bucket: era_bucket(record.year),
    }
}

/// First genre in provider order, mapped through the static table
fn genre_bucket(genres: &[String]) -> GenreBucket {
    let Some(first) = genres.first() else {
        return GenreBucket::Unknown;
    };

    let key = first.trim().to_ascii_lowercase();
    GENRE_BUCKETS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, bucket)| *bucket)
        .unwrap_or(GenreBucket::Other)
}

/// Tier bands are inclusive on their lower edge: 5.0 and 7.5 are Medium
fn rating_tier(rating: Option<f64>) -> RatingTier {
    match rating {
        None => RatingTier::Unrated,
        Some(r) if r < 5.0 => RatingTier::Low,
        Some(r) if r <= 7.5 => RatingTier::Medium,
        Some(_) => RatingTier::High,
    }
}
