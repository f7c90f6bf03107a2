use std::path::PathBuf;

use muse_gemini::{DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use serde::Deserialize;
use tracing::debug;

use crate::error::MuseError;

const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub models: ModelConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct ModelConfig {
    pub text: Option<String>,
    pub image: Option<String>,
}

/// Settings the chat needs, after CLI flags, environment and config file
/// have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("muse").join("config.toml"))
}

/// Loads the config file. A missing file yields the defaults; a malformed
/// one is an error.
pub fn load_config() -> Result<Config, MuseError> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    };

    debug!(path = %path.display(), "Loaded config file");
    Ok(toml::from_str(&content)?)
}

/// Picks the API key: environment variable first, then config file.
pub fn api_key_from(env_key: Option<String>, config: &Config) -> Result<String, MuseError> {
    env_key
        .filter(|key| !key.is_empty())
        .or_else(|| config.gemini_api_key.clone().filter(|key| !key.is_empty()))
        .ok_or(MuseError::ApiKeyNotFound)
}

pub fn resolve(
    config: Config,
    cli_text_model: Option<String>,
    cli_image_model: Option<String>,
) -> Result<Resolved, MuseError> {
    let api_key = api_key_from(std::env::var(API_KEY_ENV).ok(), &config)?;

    Ok(Resolved {
        api_key,
        base_url: config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        text_model: cli_text_model
            .or(config.models.text)
            .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
        image_model: cli_image_model
            .or(config.models.image)
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
    })
}

pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("muse")
        .join("muse.log")
}
