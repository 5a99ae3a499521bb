//! Application settings persisted in `config.toml`
//!
//! Everything in here is optional: a missing file yields the defaults, and
//! the dashboard works without ever writing one. The file exists so users
//! can point the registry client at a mirror or change UI defaults without
//! environment variables.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default remote registry queried for search and install metadata.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.smithery.ai";

/// Env var that overrides the registry base URL regardless of config.
pub const REGISTRY_URL_ENV: &str = "FORGEBOARD_REGISTRY_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Registry base URL override (defaults to the public registry)
    pub registry_url: Option<String>,
    /// Client tab selected when the dashboard first loads
    pub default_client: Option<String>,
    /// Open the browser when `serve` starts (defaults to true)
    pub open_browser: Option<bool>,
}

/// Errors that can occur when loading settings from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the settings file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the settings file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn StdError>> {
        Self::load_from_path(&Self::config_path())
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn StdError>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })?;
            let config: Config =
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: config_path.to_path_buf(),
                    source,
                })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        self.save_to_path(&Self::config_path())
    }

    pub(crate) fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub(crate) fn config_path() -> PathBuf {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "forgeboard")
            .expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }

    /// Resolve the registry base URL: env override, then config, then default.
    pub fn registry_url(&self) -> String {
        if let Ok(url) = std::env::var(REGISTRY_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        self.registry_url
            .clone()
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
    }

    /// Whether `serve` should open the dashboard in a browser.
    pub fn open_browser(&self) -> bool {
        self.open_browser.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert!(config.registry_url.is_none());
        assert!(config.default_client.is_none());
        assert!(config.open_browser());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            registry_url: Some("https://registry.example.com".to_string()),
            default_client: Some("cursor".to_string()),
            open_browser: Some(false),
        };
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(
            reloaded.registry_url.as_deref(),
            Some("https://registry.example.com")
        );
        assert_eq!(reloaded.default_client.as_deref(), Some("cursor"));
        assert!(!reloaded.open_browser());
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "registry_url = [not toml").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
