//! # cinedex Common Library
//!
//! Shared code for the cinedex services including:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Database pool creation and schema initialization
//! - Classification label vocabulary (shared between writer and reviewer)

pub mod config;
pub mod db;
pub mod error;
pub mod labels;

pub use error::{Error, Result};
