//! Configuration loading from `~/.gatherly/config.json`.
//!
//! The config file is optional: a missing file yields defaults, and the
//! `OPENAI_API_KEY` environment variable overrides the file value. A
//! missing credential only becomes an error on the first completion call.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Errors reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// App configuration for the completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// API key for the completion endpoint. The `OPENAI_API_KEY`
    /// environment variable takes precedence over this value.
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Config {
    /// Resolve the effective API key: environment first, then config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }
        self.openai_api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .cloned()
    }
}

/// The app data directory (`~/.gatherly`), created on demand.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    let dir = home.join(".gatherly");
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// The canonical config file path (`~/.gatherly/config.json`).
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("config.json"))
}

/// Load configuration, falling back to defaults when no file exists.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}
