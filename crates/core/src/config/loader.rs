use figment::{
    providers::{Format, Json, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Syntax of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let figment = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => Figment::new().merge(Json::file(path)),
        ConfigFormat::Toml => Figment::new().merge(Toml::file(path)),
    };

    let config: Config = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from a string (useful for testing)
pub fn load_config_from_str(source: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    match format {
        ConfigFormat::Json => {
            serde_json::from_str(source).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(source).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
    }
}
