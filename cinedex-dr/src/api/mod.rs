//! HTTP API handlers for cinedex-dr

pub mod export;
pub mod health;
pub mod movies;
pub mod stats;
pub mod ui;

pub use export::{export_movies_csv, export_movies_json};
pub use health::health_routes;
pub use movies::list_movies;
pub use stats::{stats_genres, stats_ratings, stats_summary, stats_years};
pub use ui::serve_index;
