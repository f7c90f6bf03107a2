use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Model,
}

/// Identifier of a message, unique within one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A supporting source attached to a grounded text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub uri: String,
    pub title: String,
}

/// One turn in the conversation.
///
/// A model message carries either references or an image, never both.
/// `references` distinguishes "no grounding metadata" (`None`) from
/// "grounding metadata without usable sources" (`Some(vec![])`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
    /// `data:` URI of a generated image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::User,
            text: text.into(),
            references: None,
            image_url: None,
        }
    }

    pub fn model(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::Model,
            text: text.into(),
            references: None,
            image_url: None,
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    /// Returns references only when there is at least one to show.
    pub fn visible_references(&self) -> Option<&[Reference]> {
        self.references
            .as_deref()
            .filter(|references| !references.is_empty())
    }
}

/// Kind of message an id is minted for; becomes the id suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Greeting,
    User,
    Text,
    Image,
    Error,
}

impl IdKind {
    fn suffix(self) -> &'static str {
        match self {
            IdKind::Greeting => "greeting",
            IdKind::User => "user",
            IdKind::Text => "text",
            IdKind::Image => "image",
            IdKind::Error => "error",
        }
    }
}

/// Mints `<unix-millis>-<sequence>-<kind>` identifiers.
///
/// The sequence keeps ids distinct when two are minted in the same
/// millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, kind: IdKind) -> MessageId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let seq = self.next;
        self.next += 1;
        MessageId(format!("{}-{}-{}", millis, seq, kind.suffix()))
    }
}
