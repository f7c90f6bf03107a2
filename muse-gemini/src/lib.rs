//! Gemini API client for muse.
//!
//! Implements [`muse_core::GenerationProvider`] on top of the
//! `generateContent` endpoint: grounded text through the Google Search tool,
//! and image-only generation through `responseModalities`.
//!
//! # Example
//!
//! ```ignore
//! use muse_core::Orchestrator;
//! use muse_gemini::GeminiClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = GeminiClient::new("your-api-key");
//!     let mut orchestrator = Orchestrator::new(Arc::new(client));
//!
//!     let _ = orchestrator.submit("How do I pick an accent color?").await;
//!     println!("{}", orchestrator.messages().last().unwrap().text);
//! }
//! ```

mod client;
mod convert;
mod error;

pub use client::{DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, GeminiClient};
pub use convert::{
    build_image_request_body, build_text_request_body, parse_image_response, parse_text_response,
};
pub use error::GeminiError;
