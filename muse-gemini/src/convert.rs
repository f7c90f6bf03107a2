use muse_core::{GroundingChunk, ImageResponse, InlineData, ResponsePart, TextResponse, WebSource};
use serde_json::{Value, json};

use crate::error::GeminiError;

fn user_content(prompt: &str) -> Value {
    json!([{
        "role": "user",
        "parts": [{ "text": prompt }]
    }])
}

/// Builds a `generateContent` body for a text answer.
pub fn build_text_request_body(prompt: &str, grounding: bool) -> Value {
    let mut body = json!({ "contents": user_content(prompt) });
    if grounding {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

/// Builds a `generateContent` body that asks for image output only.
pub fn build_image_request_body(prompt: &str) -> Value {
    json!({
        "contents": user_content(prompt),
        "generationConfig": {
            "responseModalities": ["IMAGE"]
        }
    })
}

/// Returns the first candidate, or explains why there is none.
fn first_candidate(response: &Value) -> Result<&Value, GeminiError> {
    if let Some(candidate) = response.get("candidates").and_then(|c| c.get(0)) {
        return Ok(candidate);
    }

    let reason = response
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str());

    Err(GeminiError::Malformed(match reason {
        Some(reason) => format!("Prompt blocked: {}", reason),
        None => "No candidates in response".to_string(),
    }))
}

fn candidate_parts(candidate: &Value) -> &[Value] {
    candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn parse_part(part: &Value) -> ResponsePart {
    let text = part.get("text").and_then(|t| t.as_str()).map(String::from);

    let inline_data = part.get("inlineData").and_then(|inline| {
        let data = inline.get("data").and_then(|d| d.as_str())?;
        Some(InlineData {
            mime_type: inline
                .get("mimeType")
                .and_then(|m| m.as_str())
                .map(String::from),
            data: data.to_string(),
        })
    });

    ResponsePart { text, inline_data }
}

fn parse_grounding_chunk(chunk: &Value) -> GroundingChunk {
    let web = chunk.get("web").map(|web| WebSource {
        uri: web.get("uri").and_then(|u| u.as_str()).map(String::from),
        title: web.get("title").and_then(|t| t.as_str()).map(String::from),
    });
    GroundingChunk { web }
}

/// Parses a grounded text response.
///
/// Text parts are concatenated; thought summaries are skipped. Grounding
/// chunks stay `None` unless the candidate actually lists them.
pub fn parse_text_response(response: &Value) -> Result<TextResponse, GeminiError> {
    let candidate = first_candidate(response)?;

    let mut text: Option<String> = None;
    for part in candidate_parts(candidate) {
        if part.get("thought").and_then(|t| t.as_bool()) == Some(true) {
            continue;
        }
        if let Some(chunk) = part.get("text").and_then(|t| t.as_str()) {
            text.get_or_insert_with(String::new).push_str(chunk);
        }
    }

    let grounding_chunks = candidate
        .get("groundingMetadata")
        .and_then(|m| m.get("groundingChunks"))
        .and_then(|c| c.as_array())
        .map(|chunks| chunks.iter().map(parse_grounding_chunk).collect());

    Ok(TextResponse {
        text,
        grounding_chunks,
    })
}

/// Parses an image generation response into its content parts.
pub fn parse_image_response(response: &Value) -> Result<ImageResponse, GeminiError> {
    let candidate = first_candidate(response)?;
    let parts = candidate_parts(candidate).iter().map(parse_part).collect();
    Ok(ImageResponse { parts })
}
