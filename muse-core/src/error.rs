use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a generation request or of normalizing its response.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no image data")]
    MissingImage,

    #[error("image data is not valid base64: {0}")]
    InvalidImageData(#[from] base64::DecodeError),

    #[error("response contained no text")]
    MissingText,

    #[error("request was interrupted before it settled")]
    Interrupted,
}

impl ProviderError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        ProviderError::Transport(err.into())
    }
}

/// Why a submission was ignored. Not surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejected {
    #[error("input is empty")]
    Empty,

    #[error("command has no prompt")]
    BareCommand,

    #[error("a request is already in flight")]
    Busy,
}
