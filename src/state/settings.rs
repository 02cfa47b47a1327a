/// User settings, read from an optional JSON file
///
/// Location:
/// - Linux: ~/.config/datasheet-viewer/settings.json
/// - macOS: ~/Library/Application Support/datasheet-viewer/settings.json
/// - Windows: %APPDATA%\datasheet-viewer\settings.json
///
/// Every field is optional; a missing file means all defaults.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::library::Library;

/// Placeholder replaced by the component name in `search_url`
pub const NAME_PLACEHOLDER: &str = "{name}";

pub const DEFAULT_SEARCH_URL: &str = "https://www.datasheetarchive.com/{name}-datasheet.html";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Overrides the catalog location
    pub database_path: Option<PathBuf>,
    /// Web search template, must contain `{name}`
    pub search_url: String,
    pub dark_theme: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            dark_theme: true,
        }
    }
}

impl Settings {
    /// Get the path where the settings file is looked up
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("datasheet-viewer");
        path.push("settings.json");
        path
    }

    /// Load settings from the default location
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from `path`, falling back to defaults if the file is absent
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if !settings.search_url.contains(NAME_PLACEHOLDER) {
            log::warn!(
                "search_url '{}' has no {} placeholder, using the default",
                settings.search_url,
                NAME_PLACEHOLDER
            );
            settings.search_url = DEFAULT_SEARCH_URL.to_string();
        }

        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// The catalog file to open: the configured one, or the per-user default
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(Library::default_db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.dark_theme);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "database_path": "/tmp/parts.db" }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.database_path(), PathBuf::from("/tmp/parts.db"));
        assert_eq!(settings.search_url, DEFAULT_SEARCH_URL);
        assert!(settings.dark_theme);
    }

    #[test]
    fn test_search_url_without_placeholder_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "search_url": "https://example.com/", "dark_theme": false }"#)
            .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.search_url, DEFAULT_SEARCH_URL);
        assert!(!settings.dark_theme);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_default_database_path_is_per_user() {
        let settings = Settings::default();
        assert!(settings.database_path().ends_with("datasheet-viewer/datasheets.db"));
    }
}
