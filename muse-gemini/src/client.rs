use muse_core::{GenerationProvider, ImageResponse, ProviderError, TextResponse};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::convert::{
    build_image_request_body, build_text_request_body, parse_image_response, parse_text_response,
};
use crate::error::GeminiError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Client for the Gemini `generateContent` API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Creates a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Overrides the models used for text and image requests.
    pub fn with_models(mut self, text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate_content(&self, model: &str, body: &Value) -> Result<Value, GeminiError> {
        debug!("Sending request to Gemini");

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_body: Value = response.json().await?;

        if !status.is_success() {
            let message = response_body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Received successful response");
        Ok(response_body)
    }

    /// Requests a text answer, with Google Search grounding when asked.
    #[instrument(skip(self, prompt), fields(model = %self.text_model))]
    pub async fn complete_text(
        &self,
        prompt: &str,
        grounding: bool,
    ) -> Result<TextResponse, GeminiError> {
        let body = build_text_request_body(prompt, grounding);
        let response = self.generate_content(&self.text_model, &body).await?;
        parse_text_response(&response)
    }

    /// Requests an image-only generation.
    #[instrument(skip(self, prompt), fields(model = %self.image_model))]
    pub async fn complete_image(&self, prompt: &str) -> Result<ImageResponse, GeminiError> {
        let body = build_image_request_body(prompt);
        let response = self.generate_content(&self.image_model, &body).await?;
        parse_image_response(&response)
    }
}

impl GenerationProvider for GeminiClient {
    async fn generate_text(
        &self,
        prompt: &str,
        grounding: bool,
    ) -> Result<TextResponse, ProviderError> {
        Ok(self.complete_text(prompt, grounding).await?)
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageResponse, ProviderError> {
        Ok(self.complete_image(prompt).await?)
    }
}
