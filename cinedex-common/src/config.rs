//! Configuration loading and root folder resolution
//!
//! Two-tier configuration:
//! 1. **TOML bootstrap**: root folder, API key seed, logging (read at startup)
//! 2. **Database runtime**: everything else lives in the `settings` table
//!
//! Root folder resolution priority:
//! 1. Command-line argument
//! 2. `CINEDEX_ROOT_FOLDER` environment variable
//! 3. TOML config file
//! 4. OS-dependent default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "CINEDEX_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "cinedex.db";

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. Services must restart to
/// pick up changes to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the shared database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// OMDb API key (optional bootstrap value; database copy is authoritative)
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Get the per-service TOML config path, e.g. `~/.config/cinedex/cinedex-mi.toml`
pub fn toml_config_path(service_name: &str) -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cinedex").join(format!("{}.toml", service_name)))
        .unwrap_or_else(|| PathBuf::from(format!("{}.toml", service_name)))
}

/// Load the TOML bootstrap config for a service, falling back to defaults
/// when the file is absent. A present-but-unreadable file is a hard error.
pub fn load_toml_config(service_name: &str) -> Result<TomlConfig> {
    let path = toml_config_path(service_name);
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Write TOML config, creating parent directories as needed.
///
/// Writes to a temporary sibling first and renames over the target so a
/// crash mid-write cannot leave a truncated config behind.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;

    Ok(())
}

/// Resolve the root folder holding the shared database.
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent default
    default_root_folder()
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cinedex"))
        .unwrap_or_else(|| PathBuf::from("./cinedex_data"))
}

/// Ensure the root folder exists and return the database path inside it
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Create root folder {} failed: {}", root.display(), e)))?;
    Ok(root.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cli_argument_wins_over_toml() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };
        let resolved = resolve_root_folder(Some(Path::new("/from/cli")), &toml);
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn toml_used_when_no_cli_or_env() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };
        // Note: assumes CINEDEX_ROOT_FOLDER is not set in the test environment
        if std::env::var(ROOT_FOLDER_ENV).is_ok() {
            return;
        }
        let resolved = resolve_root_folder(None, &toml);
        assert_eq!(resolved, PathBuf::from("/from/toml"));
    }

    #[test]
    fn write_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cinedex-mi.toml");

        let config = TomlConfig {
            root_folder: Some(PathBuf::from("/data/cinedex")),
            omdb_api_key: Some("abcd1234".to_string()),
            logging: LoggingConfig::default(),
        };
        write_toml_config(&config, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: TomlConfig = toml::from_str(&content).unwrap();
        assert_eq!(loaded.root_folder, Some(PathBuf::from("/data/cinedex")));
        assert_eq!(loaded.omdb_api_key, Some("abcd1234".to_string()));
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn ensure_root_folder_creates_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("cinedex");
        let db_path = ensure_root_folder(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(db_path, root.join(DATABASE_FILE_NAME));
    }
}
