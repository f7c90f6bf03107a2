//! Scripted provider for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::ProviderError;
use crate::provider::{GenerationProvider, ImageResponse, TextResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Text { prompt: String, grounding: bool },
    Image { prompt: String },
}

/// Replays queued responses in order and records every call.
/// An empty queue answers with a malformed-response error.
#[derive(Default)]
pub struct ScriptedProvider {
    calls: Mutex<Vec<Call>>,
    text: Mutex<VecDeque<Result<TextResponse, ProviderError>>>,
    image: Mutex<VecDeque<Result<ImageResponse, ProviderError>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, response: Result<TextResponse, ProviderError>) {
        self.text.lock().unwrap().push_back(response);
    }

    pub fn push_image(&self, response: Result<ImageResponse, ProviderError>) {
        self.image.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn unscripted() -> ProviderError {
    ProviderError::Malformed("no scripted response".to_string())
}

impl GenerationProvider for ScriptedProvider {
    async fn generate_text(
        &self,
        prompt: &str,
        grounding: bool,
    ) -> Result<TextResponse, ProviderError> {
        self.calls.lock().unwrap().push(Call::Text {
            prompt: prompt.to_string(),
            grounding,
        });
        self.text.lock().unwrap().pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageResponse, ProviderError> {
        self.calls.lock().unwrap().push(Call::Image {
            prompt: prompt.to_string(),
        });
        self.image.lock().unwrap().pop_front().unwrap_or_else(|| Err(unscripted()))
    }
}
