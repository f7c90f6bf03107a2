/// Command token that switches a submission to image generation.
pub const IMAGINE_COMMAND: &str = "/imagine";

const IMAGINE_PREFIX: &str = "/imagine ";

/// Which generation capability a submission is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Grounded chat with the mentor persona.
    Text,
    /// Image-only generation.
    Image,
}

/// A submission after routing: the mode and the prompt sent for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedInput {
    pub mode: RequestMode,
    pub prompt: String,
}

/// Routes raw input to a request mode.
///
/// The command prefix is case-sensitive and needs its trailing space.
/// Everything after the prefix is the image prompt, untouched.
pub fn classify(input: &str) -> ClassifiedInput {
    let trimmed = input.trim();
    match trimmed.strip_prefix(IMAGINE_PREFIX) {
        Some(prompt) => ClassifiedInput {
            mode: RequestMode::Image,
            prompt: prompt.to_string(),
        },
        None => ClassifiedInput {
            mode: RequestMode::Text,
            prompt: trimmed.to_string(),
        },
    }
}
