use muse_core::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<GeminiError> for ProviderError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Http(e) => ProviderError::transport(e),
            GeminiError::Api { status, message } => ProviderError::Api { status, message },
            GeminiError::Malformed(message) => ProviderError::Malformed(message),
        }
    }
}
