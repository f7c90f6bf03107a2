//! End-to-end conversation turns against an in-memory provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use muse_core::{
    Author, FALLBACK_TEXT, GenerationProvider, GroundingChunk, ImageResponse, InlineData,
    InputRejected, Orchestrator, PERSONA, ProviderError, ResponsePart, Status, TextResponse,
    WebSource,
};
use tokio::sync::Notify;

/// Answers every text request with a fixed grounded reply and every image
/// request with a tiny PNG, optionally failing or waiting for a release.
#[derive(Default)]
struct FakeGemini {
    fail: bool,
    gate: Option<Arc<Notify>>,
    text_calls: AtomicUsize,
    image_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeGemini {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    fn total_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst) + self.image_calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) -> Result<(), ProviderError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(ProviderError::transport("connection reset by peer"));
        }
        Ok(())
    }
}

impl GenerationProvider for FakeGemini {
    async fn generate_text(
        &self,
        prompt: &str,
        grounding: bool,
    ) -> Result<TextResponse, ProviderError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.wait().await?;
        assert!(grounding);
        Ok(TextResponse {
            text: Some("Try a geometric sans such as Montserrat for body text.".to_string()),
            grounding_chunks: Some(vec![
                GroundingChunk {
                    web: Some(WebSource {
                        uri: Some("https://fonts.google.com".to_string()),
                        title: Some("Google Fonts".to_string()),
                    }),
                },
                GroundingChunk {
                    web: Some(WebSource {
                        uri: Some("https://example.com/untitled".to_string()),
                        title: None,
                    }),
                },
            ]),
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageResponse, ProviderError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.wait().await?;
        Ok(ImageResponse {
            parts: vec![ResponsePart {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: Some("image/png".to_string()),
                    data: "iVBORw0KGgo=".to_string(),
                }),
            }],
        })
    }
}

#[tokio::test]
async fn grounded_question_appends_user_then_model() {
    let provider = Arc::new(FakeGemini::default());
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    orch.submit("What fonts pair well with a serif heading?")
        .await
        .unwrap();

    let messages = orch.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].author, Author::User);
    assert_eq!(messages[1].text, "What fonts pair well with a serif heading?");

    let reply = &messages[2];
    assert_eq!(reply.author, Author::Model);
    assert!(!reply.text.is_empty());
    assert!(reply.image_url.is_none());
    let references = reply.references.as_ref().unwrap();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].title, "Google Fonts");

    let prompts = provider.prompts.lock().unwrap();
    assert!(prompts[0].starts_with(PERSONA));
    assert!(prompts[0].contains("What fonts pair well with a serif heading?"));
}

#[tokio::test]
async fn imagine_command_produces_captioned_image() {
    let provider = Arc::new(FakeGemini::default());
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    orch.submit("/imagine a minimalist logo for a coffee shop")
        .await
        .unwrap();

    assert_eq!(provider.image_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.text_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        provider.prompts.lock().unwrap()[0],
        "a minimalist logo for a coffee shop"
    );

    let messages = orch.messages();
    let reply = messages.last().unwrap();
    assert_eq!(
        reply.text,
        "Here is my take on: \"a minimalist logo for a coffee shop\""
    );
    assert!(
        reply
            .image_url
            .as_deref()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    assert!(reply.references.is_none());
}

#[tokio::test]
async fn provider_failure_becomes_fallback_reply() {
    let provider = Arc::new(FakeGemini::failing());
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    orch.submit("Critique my palette").await.unwrap();

    assert_eq!(orch.status(), Status::Idle);
    let messages = orch.messages();
    assert_eq!(messages.len(), 3);
    let reply = messages.last().unwrap();
    assert_eq!(reply.author, Author::Model);
    assert_eq!(reply.text, FALLBACK_TEXT);
    assert!(reply.references.is_none());
    assert!(reply.image_url.is_none());
}

#[tokio::test]
async fn empty_submission_is_ignored() {
    let provider = Arc::new(FakeGemini::default());
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    assert_eq!(orch.submit("").await, Err(InputRejected::Empty));

    assert_eq!(orch.messages().len(), 1);
    assert_eq!(orch.status(), Status::Idle);
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn submit_while_in_flight_is_dropped() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(FakeGemini::gated(Arc::clone(&gate)));
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    let pending = orch.begin("How big should my logo be?").unwrap();
    let task = tokio::spawn(pending.run());

    assert_eq!(orch.status(), Status::AwaitingResponse);
    assert_eq!(orch.begin("Hello?").err(), Some(InputRejected::Busy));
    assert_eq!(orch.begin("/imagine a cat").err(), Some(InputRejected::Busy));
    assert_eq!(orch.messages().len(), 2);

    gate.notify_one();
    task.await.unwrap();

    assert_eq!(orch.status(), Status::Idle);
    assert_eq!(orch.messages().len(), 3);
    assert_eq!(provider.total_calls(), 1);

    gate.notify_one();
    orch.submit("Next question").await.unwrap();
    assert_eq!(orch.messages().len(), 5);
}

#[tokio::test]
async fn each_turn_appends_exactly_one_reply() {
    let provider = Arc::new(FakeGemini::failing());
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    for prompt in ["one", "/imagine two", "three"] {
        orch.submit(prompt).await.unwrap();
    }

    let authors: Vec<Author> = orch.messages().iter().map(|m| m.author).collect();
    assert_eq!(
        authors,
        vec![
            Author::Model,
            Author::User,
            Author::Model,
            Author::User,
            Author::Model,
            Author::User,
            Author::Model,
        ]
    );
}

#[tokio::test]
async fn abandoned_submit_settles_with_fallback() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(FakeGemini::gated(gate));
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    let timed_out = tokio::time::timeout(Duration::from_millis(20), orch.submit("hello")).await;
    assert!(timed_out.is_err());
    assert_eq!(provider.total_calls(), 1);

    assert_eq!(orch.status(), Status::Idle);
    {
        let messages = orch.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, "hello");
        assert_eq!(messages[2].author, Author::Model);
        assert_eq!(messages[2].text, FALLBACK_TEXT);
    }

    let next = orch.begin("still there?");
    assert!(next.is_ok());
}

#[tokio::test]
async fn aborted_task_settles_with_fallback() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(FakeGemini::gated(gate));
    let mut orch = Orchestrator::new(Arc::clone(&provider));

    let pending = orch.begin("/imagine a brutalist bookshelf").unwrap();
    let task = tokio::spawn(pending.run());
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(orch.status(), Status::Idle);
    let messages = orch.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].text, FALLBACK_TEXT);
    assert!(messages[2].image_url.is_none());
}
