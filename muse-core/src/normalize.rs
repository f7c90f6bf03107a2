use base64::Engine;

use crate::dispatch::ProviderResponse;
use crate::error::ProviderError;
use crate::message::{Message, MessageId, Reference};
use crate::provider::{GroundingChunk, ImageResponse, TextResponse};

/// Caption attached to a generated image.
pub fn image_caption(prompt: &str) -> String {
    format!("Here is my take on: \"{}\"", prompt)
}

/// Turns a provider response into the model's message for this turn.
pub fn normalize(
    response: ProviderResponse,
    prompt: &str,
    id: MessageId,
) -> Result<Message, ProviderError> {
    match response {
        ProviderResponse::Image(image) => normalize_image(&image, prompt, id),
        ProviderResponse::Text(text) => normalize_text(text, id),
    }
}

fn normalize_image(
    response: &ImageResponse,
    prompt: &str,
    id: MessageId,
) -> Result<Message, ProviderError> {
    let inline = response
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .ok_or(ProviderError::MissingImage)?;

    base64::engine::general_purpose::STANDARD.decode(inline.data.as_bytes())?;

    let mut message = Message::model(id, image_caption(prompt));
    message.image_url = Some(format!("data:image/png;base64,{}", inline.data));
    Ok(message)
}

fn normalize_text(response: TextResponse, id: MessageId) -> Result<Message, ProviderError> {
    let text = response
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or(ProviderError::MissingText)?;

    let mut message = Message::model(id, text);
    message.references = response.grounding_chunks.map(|chunks| references(&chunks));
    Ok(message)
}

/// Keeps chunks that name both a uri and a title, in order.
fn references(chunks: &[GroundingChunk]) -> Vec<Reference> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
            let title = web.title.as_deref().filter(|t| !t.is_empty())?;
            Some(Reference {
                uri: uri.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}
