use std::path::PathBuf;

use anyhow::{Context, Result};
use campusfeed_core::config::FilterConfig;
use serde::Deserialize;

/// Global configuration at ~/.config/campusfeed/config.toml
///
/// Tokens may instead come from the CAMPUSFEED_TOKEN and
/// CAMPUSFEED_BASIC_TOKEN environment variables.
#[derive(Deserialize, Clone, Default)]
pub struct GlobalConfig {
    pub token: Option<String>,
    pub basic_token: Option<String>,

    pub base_url: Option<String>,
    pub basic_base_url: Option<String>,

    /// Filter tables; the defaults cover the TUM deployment.
    #[serde(default)]
    pub filter: FilterConfig,
}

impl GlobalConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("campusfeed");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file if present; fall back to defaults otherwise.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn token(&self) -> Result<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("CAMPUSFEED_TOKEN").ok())
            .context("No token configured: set `token` in config.toml or CAMPUSFEED_TOKEN")
    }

    pub fn basic_token(&self) -> Result<String> {
        self.basic_token
            .clone()
            .or_else(|| std::env::var("CAMPUSFEED_BASIC_TOKEN").ok())
            .context(
                "No basic token configured: set `basic_token` in config.toml or CAMPUSFEED_BASIC_TOKEN",
            )
    }
}
