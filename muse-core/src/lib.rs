//! Message orchestration for a design-mentor chat.
//!
//! User input is routed either to grounded text chat or, with the
//! `/imagine <prompt>` command, to image generation. Provider responses are
//! normalized into [`Message`]s and appended to an append-only conversation
//! owned by the [`Orchestrator`].
//!
//! # Example
//!
//! ```ignore
//! use muse_core::Orchestrator;
//! use std::sync::Arc;
//!
//! let mut orchestrator = Orchestrator::new(Arc::new(provider));
//! orchestrator.submit("/imagine a minimalist logo for a coffee shop").await?;
//!
//! for message in orchestrator.messages().iter() {
//!     println!("{:?}: {}", message.author, message.text);
//! }
//! ```

mod classify;
mod dispatch;
mod error;
mod message;
mod normalize;
mod orchestrator;
mod provider;

#[cfg(test)]
mod testing;

pub use classify::{ClassifiedInput, IMAGINE_COMMAND, RequestMode, classify};
pub use dispatch::{PERSONA, ProviderResponse, dispatch, persona_prompt};
pub use error::{InputRejected, ProviderError};
pub use message::{Author, IdGenerator, IdKind, Message, MessageId, Reference};
pub use normalize::{image_caption, normalize};
pub use orchestrator::{FALLBACK_TEXT, GREETING, Messages, Orchestrator, PendingRequest, Status};
pub use provider::{
    GenerationProvider, GroundingChunk, ImageResponse, InlineData, ResponsePart, TextResponse,
    WebSource,
};
