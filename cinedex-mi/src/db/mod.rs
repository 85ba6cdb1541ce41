//! Database access for cinedex-mi
//!
//! cinedex-mi is the single writer of durable state; all modules here go
//! through the shared pool opened by `cinedex_common::db::init_database`.

pub mod movies;
pub mod sessions;
pub mod settings;
pub mod watchlists;
