//! HTTP API handlers for cinedex-mi

pub mod health;
pub mod ingest;
pub mod search;
pub mod settings;
pub mod ui;
pub mod watchlists;

pub use health::health_routes;
pub use ingest::ingest_routes;
pub use search::search_routes;
pub use settings::settings_routes;
pub use ui::ui_routes;
pub use watchlists::watchlist_routes;
