//! Derived classification label vocabulary
//!
//! These tokens are stored in the `movies` table and accepted as filter
//! values by the review service, so both services share one definition.
//! Parsing is case-insensitive; serialization always emits the canonical
//! lowercase token.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse genre bucket derived from the provider's genre list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenreBucket {
    Action,
    Comedy,
    Drama,
    SciFiFantasy,
    Thriller,
    Family,
    Documentary,
    /// Genre present but not in the mapping table
    Other,
    /// No genre information from the provider
    Unknown,
}

impl GenreBucket {
    pub const ALL: [GenreBucket; 9] = [
        GenreBucket::Action,
        GenreBucket::Comedy,
        GenreBucket::Drama,
        GenreBucket::SciFiFantasy,
        GenreBucket::Thriller,
        GenreBucket::Family,
        GenreBucket::Documentary,
        GenreBucket::Other,
        GenreBucket::Unknown,
    ];

    /// Canonical token, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            GenreBucket::Action => "action",
            GenreBucket::Comedy => "comedy",
            GenreBucket::Drama => "drama",
            GenreBucket::SciFiFantasy => "sci-fi-fantasy",
            GenreBucket::Thriller => "thriller",
            GenreBucket::Family => "family",
            GenreBucket::Documentary => "documentary",
            GenreBucket::Other => "other",
            GenreBucket::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GenreBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenreBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        GenreBucket::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == token)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown genre bucket: {}", s)))
    }
}

/// Rating tier derived from the provider's 0-10 rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingTier {
    /// No rating reported by the provider
    Unrated,
    /// rating < 5.0
    Low,
    /// 5.0 <= rating <= 7.5
    Medium,
    /// rating > 7.5
    High,
}

impl RatingTier {
    pub const ALL: [RatingTier; 4] = [
        RatingTier::Unrated,
        RatingTier::Low,
        RatingTier::Medium,
        RatingTier::High,
    ];

    /// Canonical token, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingTier::Unrated => "unrated",
            RatingTier::Low => "low",
            RatingTier::Medium => "medium",
            RatingTier::High => "high",
        }
    }
}

impl fmt::Display for RatingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        RatingTier::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == token)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown rating tier: {}", s)))
    }
}

/// Era bucket label for a missing release year
pub const ERA_UNKNOWN: &str = "Unknown";

/// Decade label for a release year, e.g. 1999 -> "1990s"
pub fn era_bucket(year: Option<i32>) -> String {
    match year {
        Some(y) => format!("{}s", (y / 10) * 10),
        None => ERA_UNKNOWN.to_string(),
    }
}
