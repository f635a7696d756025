use crate::error::{ComposerError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ComposerError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Environment override takes precedence over the file, so deployments can
    /// point the CLI at a different backend without editing config.toml.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        if let Ok(url) = std::env::var("STOREFRONT_API_URL") {
            config.api.base_url = url;
        }
        Ok(config)
    }
}
