use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuseError {
    #[error("API key not found. Set GEMINI_API_KEY or configure ~/.config/muse/config.toml")]
    ApiKeyNotFound,

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
