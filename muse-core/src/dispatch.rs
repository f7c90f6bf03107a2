use tracing::{debug, instrument};

use crate::classify::{ClassifiedInput, RequestMode};
use crate::error::ProviderError;
use crate::provider::{GenerationProvider, ImageResponse, TextResponse};

/// Instruction prepended to every grounded text prompt.
pub const PERSONA: &str = "You are a friendly, expert design mentor. \
Give encouraging and practical advice.";

/// Raw provider output, tagged by the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    Text(TextResponse),
    Image(ImageResponse),
}

/// Wraps a user prompt with the mentor persona.
pub fn persona_prompt(prompt: &str) -> String {
    format!("{}\n\nUser question: {}", PERSONA, prompt)
}

/// Issues the single provider request for a classified submission.
#[instrument(skip(provider, input), fields(mode = ?input.mode, prompt_len = input.prompt.len()))]
pub async fn dispatch<P: GenerationProvider>(
    provider: &P,
    input: &ClassifiedInput,
) -> Result<ProviderResponse, ProviderError> {
    let response = match input.mode {
        RequestMode::Image => {
            debug!("Requesting image generation");
            ProviderResponse::Image(provider.generate_image(&input.prompt).await?)
        }
        RequestMode::Text => {
            debug!("Requesting grounded text");
            let prompt = persona_prompt(&input.prompt);
            ProviderResponse::Text(provider.generate_text(&prompt, true).await?)
        }
    };

    debug!("Provider responded");
    Ok(response)
}
