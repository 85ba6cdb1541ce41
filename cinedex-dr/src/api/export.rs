//! Export endpoints
//!
//! Serialize the (optionally filtered) movie listing as CSV or JSON. Filters
//! reuse the listing validation, so a bad bucket value is a 400 here too.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use serde::Deserialize;

use crate::db::movies::{self, MovieFilter, MovieRow};
use crate::error::ApiResult;
use crate::AppState;

/// Export filter parameters (no pagination; exports are complete)
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub genre_bucket: Option<String>,
    pub rating_tier: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

impl ExportQuery {
    fn into_filter(self) -> ApiResult<MovieFilter> {
        Ok(MovieFilter::parse(
            self.genre_bucket.as_deref(),
            self.rating_tier.as_deref(),
            self.year_min,
            self.year_max,
        )?)
    }
}

/// GET /api/export/movies.csv
pub async fn export_movies_csv(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<(HeaderMap, String)> {
    let filter = query.into_filter()?;
    let rows = movies::list_all_movies(&state.db, &filter).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"movies.csv\""),
    );

    Ok((headers, movies_to_csv(&rows)))
}

/// GET /api/export/movies.json
pub async fn export_movies_json(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Json<Vec<MovieRow>>> {
    let filter = query.into_filter()?;
    Ok(Json(movies::list_all_movies(&state.db, &filter).await?))
}

/// Assemble the CSV document, header row first
fn movies_to_csv(rows: &[MovieRow]) -> String {
    let mut out = String::from(
        "imdb_id,title,year,genres,rating,runtime_minutes,director,genre_bucket,rating_tier,era_bucket\n",
    );

    for row in rows {
        let fields = [
            row.imdb_id.clone(),
            row.title.clone(),
            row.year.map(|y| y.to_string()).unwrap_or_default(),
            row.genres.join("; "),
            row.rating.map(|r| r.to_string()).unwrap_or_default(),
            row.runtime_minutes.map(|m| m.to_string()).unwrap_or_default(),
            row.director.clone().unwrap_or_default(),
            row.genre_bucket.clone(),
            row.rating_tier.clone(),
            row.era_bucket.clone(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// Quote a CSV field when it contains the delimiter, quotes, or newlines
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str) -> MovieRow {
        MovieRow {
            imdb_id: "tt0000001".to_string(),
            title: title.to_string(),
            year: Some(2000),
            genres: vec!["Drama".to_string()],
            rating: Some(7.0),
            runtime_minutes: None,
            director: None,
            genre_bucket: "drama".to_string(),
            rating_tier: "medium".to_string(),
            era_bucket: "2000s".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let csv = movies_to_csv(&[row("Heat"), row("Alien")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("imdb_id,title,year"));
        assert!(lines[1].contains("Heat"));
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let csv = movies_to_csv(&[row("Crouching Tiger, Hidden Dragon")]);
        assert!(csv.contains("\"Crouching Tiger, Hidden Dragon\""));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = movies_to_csv(&[row("The \"Best\" Movie")]);
        assert!(csv.contains("\"The \"\"Best\"\" Movie\""));
    }
}
