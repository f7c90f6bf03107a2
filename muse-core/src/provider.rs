use std::future::Future;

use crate::error::ProviderError;

/// A web source backing part of a grounded answer. Either field may be
/// missing in what the provider sends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

/// Response to a grounded text request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextResponse {
    pub text: Option<String>,
    /// `None` when the provider attached no grounding metadata at all.
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

/// Base64 payload embedded in a response part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

/// Response to an image generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResponse {
    pub parts: Vec<ResponsePart>,
}

/// An external generative backend.
///
/// Each call is one round trip. Transport failures, non-success statuses and
/// undecodable bodies all come back as [`ProviderError`].
pub trait GenerationProvider: Send + Sync + 'static {
    /// Generates a text answer, optionally with search grounding.
    fn generate_text(
        &self,
        prompt: &str,
        grounding: bool,
    ) -> impl Future<Output = Result<TextResponse, ProviderError>> + Send;

    /// Generates an image and nothing else.
    fn generate_image(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<ImageResponse, ProviderError>> + Send;
}
