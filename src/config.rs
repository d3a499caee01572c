use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Context, OptionExt, Result, eyre};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::playlist_store::MAXIMUM_PER_REQUEST;

const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the Spotify Web API
    pub api_base_url: Url,
    pub request_timeout_secs: u64,
    /// Tracks sent per replace/append request when saving
    pub maximum_per_request: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default api url is valid"),
            request_timeout_secs: 10,
            maximum_per_request: MAXIMUM_PER_REQUEST,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-editor").join("config.toml"))
    }

    /// Load the default config file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config to the default path, unless a file is already there
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_eyre("No config directory on this platform")?;
        Self::default().write_if_missing(&path)?;
        Ok(path)
    }

    fn write_if_missing(&self, path: &Path) -> Result<()> {
        if path.exists() {
            tracing::info!("Config already exists at {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).wrap_err("Failed to serialize config")?;
        std::fs::write(path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.maximum_per_request == 0 || self.maximum_per_request > MAXIMUM_PER_REQUEST {
            return Err(eyre!(
                "maximum_per_request must be between 1 and {}, got {}",
                MAXIMUM_PER_REQUEST,
                self.maximum_per_request
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 30\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.maximum_per_request, 100);
        assert_eq!(config.api_base_url.as_str(), "https://api.spotify.com/v1");
    }

    #[test]
    fn test_rejects_oversized_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "maximum_per_request = 250\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_write_if_missing_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::default().write_if_missing(&path).unwrap();
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_write_if_missing_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "maximum_per_request = 50\n").unwrap();

        Config::default().write_if_missing(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap().maximum_per_request, 50);
    }
}
