use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::classify::{ClassifiedInput, IMAGINE_COMMAND, RequestMode, classify};
use crate::dispatch::dispatch;
use crate::error::{InputRejected, ProviderError};
use crate::message::{IdGenerator, IdKind, Message, MessageId};
use crate::normalize::normalize;
use crate::provider::GenerationProvider;

/// First message of every conversation.
pub const GREETING: &str = "Hi! I'm your design mentor. Ask me anything about \
typography, color, layout or branding, or type /imagine followed by a description \
to sketch an idea.";

/// Model reply appended whenever a request fails.
pub const FALLBACK_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    AwaitingResponse,
}

struct Conversation {
    messages: Vec<Message>,
    status: Status,
    ids: IdGenerator,
}

impl Conversation {
    /// Appends the reply (or the fallback) and returns to idle.
    fn settle(&mut self, result: Result<Message, ProviderError>) {
        if self.status != Status::AwaitingResponse {
            warn!("settle called with no request in flight");
            return;
        }

        let message = match result {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Generation failed, appending fallback reply");
                Message::model(self.ids.next_id(IdKind::Error), FALLBACK_TEXT)
            }
        };

        self.messages.push(message);
        self.status = Status::Idle;
    }
}

type SharedConversation = Arc<Mutex<Conversation>>;

fn lock(state: &SharedConversation) -> MutexGuard<'_, Conversation> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the conversation log and the in-flight flag.
///
/// At most one request is outstanding. Submissions made while one is in
/// flight are dropped, not queued. The log only grows.
pub struct Orchestrator<P> {
    provider: Arc<P>,
    state: SharedConversation,
}

/// Read access to the conversation log.
///
/// Holds the conversation lock: drop it before settling a request on the
/// same thread.
pub struct Messages<'a>(MutexGuard<'a, Conversation>);

impl Deref for Messages<'_> {
    type Target = [Message];

    fn deref(&self) -> &[Message] {
        &self.0.messages
    }
}

/// The work for one accepted submission, detached from the orchestrator so
/// the host can run it on another task.
///
/// Running it appends the reply. Dropping it before it finishes, whether
/// never started, cancelled mid-flight or unwound by a panic, appends the
/// fallback reply instead. Either way the conversation returns to idle.
pub struct PendingRequest<P> {
    provider: Arc<P>,
    input: ClassifiedInput,
    reply_id: Option<MessageId>,
    state: SharedConversation,
    settled: bool,
}

impl<P> PendingRequest<P> {
    fn settle(&mut self, result: Result<Message, ProviderError>) {
        if !self.settled {
            self.settled = true;
            lock(&self.state).settle(result);
        }
    }
}

impl<P> Drop for PendingRequest<P> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Pending request dropped before settling");
            self.settle(Err(ProviderError::Interrupted));
        }
    }
}

impl<P: GenerationProvider> PendingRequest<P> {
    pub fn input(&self) -> &ClassifiedInput {
        &self.input
    }

    /// Dispatches the request, normalizes the response and appends the
    /// resulting reply.
    pub async fn run(mut self) {
        let result = self.generate().await;
        self.settle(result);
    }

    async fn generate(&mut self) -> Result<Message, ProviderError> {
        let response = dispatch(self.provider.as_ref(), &self.input).await?;
        let reply_id = self.reply_id.take().ok_or(ProviderError::Interrupted)?;
        normalize(response, &self.input.prompt, reply_id)
    }
}

impl<P: GenerationProvider> Orchestrator<P> {
    pub fn new(provider: Arc<P>) -> Self {
        let mut ids = IdGenerator::new();
        let greeting = Message::model(ids.next_id(IdKind::Greeting), GREETING);
        Self {
            provider,
            state: Arc::new(Mutex::new(Conversation {
                messages: vec![greeting],
                status: Status::Idle,
                ids,
            })),
        }
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages(lock(&self.state))
    }

    pub fn status(&self) -> Status {
        lock(&self.state).status
    }

    pub fn is_awaiting(&self) -> bool {
        self.status() == Status::AwaitingResponse
    }

    /// Accepts a submission: appends the user message, marks the
    /// conversation as awaiting and hands back the request to run.
    pub fn begin(&mut self, text: &str) -> Result<PendingRequest<P>, InputRejected> {
        let mut conversation = lock(&self.state);

        if let Err(rejected) = check(conversation.status, text) {
            debug!(reason = %rejected, "Ignoring submission");
            return Err(rejected);
        }

        let trimmed = text.trim();
        let input = classify(trimmed);
        let reply_kind = match input.mode {
            RequestMode::Text => IdKind::Text,
            RequestMode::Image => IdKind::Image,
        };

        let user_id = conversation.ids.next_id(IdKind::User);
        conversation.messages.push(Message::user(user_id, trimmed));
        conversation.status = Status::AwaitingResponse;
        let reply_id = conversation.ids.next_id(reply_kind);

        debug!(mode = ?input.mode, "Submission accepted");

        Ok(PendingRequest {
            provider: Arc::clone(&self.provider),
            input,
            reply_id: Some(reply_id),
            state: Arc::clone(&self.state),
            settled: false,
        })
    }

    /// Runs a whole turn in place: begin, dispatch, normalize, append.
    ///
    /// Dropping the returned future early still settles the turn with the
    /// fallback reply.
    pub async fn submit(&mut self, text: &str) -> Result<(), InputRejected> {
        let pending = self.begin(text)?;
        pending.run().await;
        Ok(())
    }
}

fn check(status: Status, text: &str) -> Result<(), InputRejected> {
    if status == Status::AwaitingResponse {
        return Err(InputRejected::Busy);
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputRejected::Empty);
    }
    if trimmed == IMAGINE_COMMAND {
        return Err(InputRejected::BareCommand);
    }
    Ok(())
}
