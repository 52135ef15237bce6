//! Configuration management for chores.
//!
//! Loads configuration from ${CHORES_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chore-tracker backend
    pub server_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: Self::DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl Config {
    /// Default backend URL for local development setups.
    pub const DEFAULT_SERVER_URL: &'static str = "http://localhost:8000";

    /// Loads the configuration from the default path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads the configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Resolves the backend URL with precedence: override > env > config.
    ///
    /// # Errors
    /// Returns an error if the winning value is not a well-formed URL.
    pub fn resolve_server_url(&self, override_url: Option<&str>) -> Result<String> {
        if let Some(url) = override_url {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }

        if let Ok(env_url) = std::env::var("CHORES_SERVER_URL") {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }

        validate_url(&self.server_url)?;
        Ok(self.server_url.trim_end_matches('/').to_string())
    }
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid server URL: {url}"))?;
    Ok(())
}

pub mod paths {
    //! Path resolution for chores configuration and data directories.
    //!
    //! CHORES_HOME resolution order:
    //! 1. CHORES_HOME environment variable (if set)
    //! 2. ~/.config/chores (default)

    use std::path::PathBuf;

    /// Returns the chores home directory.
    ///
    /// Checks CHORES_HOME env var first, falls back to ~/.config/chores
    pub fn chores_home() -> PathBuf {
        if let Ok(home) = std::env::var("CHORES_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("chores"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        chores_home().join("config.toml")
    }
}
