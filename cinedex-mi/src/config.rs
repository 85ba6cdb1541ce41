//! Configuration resolution for cinedex-mi
//!
//! The OMDb API key resolves through three tiers with Database -> ENV ->
//! TOML priority. The database copy is authoritative; a key found only in
//! the environment or TOML is migrated into the database on startup so the
//! Web UI sees it afterwards.

use cinedex_common::config::TomlConfig;
use cinedex_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{info, warn};

/// Environment variable carrying the OMDb API key
pub const OMDB_API_KEY_ENV: &str = "CINEDEX_OMDB_API_KEY";

/// Resolve the OMDb API key from 3-tier configuration.
///
/// Priority: Database -> ENV -> TOML. Returns the key's source alongside
/// the key so the caller can decide whether to migrate it.
pub async fn resolve_omdb_api_key(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
) -> Result<(String, &'static str)> {
    let db_key = crate::db::settings::get_omdb_api_key(db).await?.filter(|k| is_valid_key(k));
    let env_key = std::env::var(OMDB_API_KEY_ENV).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config.omdb_api_key.clone().filter(|k| is_valid_key(k));

    let mut sources = Vec::new();
    if db_key.is_some() {
        sources.push("database");
    }
    if env_key.is_some() {
        sources.push("environment");
    }
    if toml_key.is_some() {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "OMDb API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(key) = db_key {
        info!("OMDb API key loaded from database");
        return Ok((key, "database"));
    }
    if let Some(key) = env_key {
        info!("OMDb API key loaded from environment variable");
        return Ok((key, "environment"));
    }
    if let Some(key) = toml_key {
        info!("OMDb API key loaded from TOML config");
        return Ok((key, "TOML"));
    }

    Err(Error::Config(format!(
        "OMDb API key not configured. Please configure using one of:\n\
         1. Web UI: http://localhost:5731/ (settings)\n\
         2. Environment: {}=your-key-here\n\
         3. TOML config: {} (omdb_api_key = \"your-key\")\n\
         \n\
         Obtain an API key at: https://www.omdbapi.com/apikey.aspx",
        OMDB_API_KEY_ENV,
        cinedex_common::config::toml_config_path("cinedex-mi").display()
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Sync the API key into the TOML config file (best-effort backup)
pub fn sync_key_to_toml(key: &str, toml_path: &Path) -> Result<()> {
    let mut config = if toml_path.exists() {
        let content = std::fs::read_to_string(toml_path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?
    } else {
        TomlConfig::default()
    };

    config.omdb_api_key = Some(key.to_string());

    match cinedex_common::config::write_toml_config(&config, toml_path) {
        Ok(()) => {
            info!("Settings synced to TOML: {}", toml_path.display());
            Ok(())
        }
        Err(e) => {
            warn!("TOML write failed (database write succeeded): {}", e);
            Ok(())
        }
    }
}

/// Migrate a key found in ENV/TOML into the database (authoritative copy)
pub async fn migrate_key_to_database(
    key: String,
    source: &str,
    db: &Pool<Sqlite>,
    toml_path: &Path,
) -> Result<()> {
    crate::db::settings::set_omdb_api_key(db, key.clone()).await?;

    // Keep a TOML backup when the key only lived in the environment
    if source == "environment" {
        sync_key_to_toml(&key, toml_path)?;
    }

    info!("OMDb API key migrated from {} to database", source);
    Ok(())
}
