use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::providers::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a message may still receive deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Complete,
    Streaming,
}

/// One turn of the conversation.
///
/// `images` holds data-URL strings in the order they were attached; the
/// core never looks inside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: MessageStatus,
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::User,
            content: text.into(),
            timestamp: Utc::now(),
            images: Vec::new(),
            status: MessageStatus::Complete,
        }
    }

    #[must_use]
    pub fn user_with_images(text: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            images,
            ..Self::user(text)
        }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::Assistant,
            content: text.into(),
            timestamp: Utc::now(),
            images: Vec::new(),
            status: MessageStatus::Complete,
        }
    }

    /// An assistant message opened by the first delta of a reply.
    #[must_use]
    pub fn streaming_assistant(delta: impl Into<String>) -> Self {
        Self {
            status: MessageStatus::Streaming,
            ..Self::assistant(delta)
        }
    }

    /// Returns a copy of this message with `delta` appended to its content.
    #[must_use]
    pub fn extended(&self, delta: &str) -> Self {
        let mut content = String::with_capacity(self.content.len() + delta.len());
        content.push_str(&self.content);
        content.push_str(delta);
        Self {
            content,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn frozen(self) -> Self {
        Self {
            status: MessageStatus::Complete,
            ..self
        }
    }

    #[must_use]
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }
}

/// History handed to a backend for one reply.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

impl ChatRequest {
    #[must_use]
    pub const fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// One decoded unit of a reply stream.
///
/// A well-formed stream is zero or more `Delta`s followed by exactly one
/// `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    Done,
    Error(ProviderError),
}

pub type EventStream = futures::stream::BoxStream<'static, StreamEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("one");
        let b = Message::user("one");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_extended_keeps_identity() {
        let msg = Message::streaming_assistant("## Simple");
        let next = msg.extended(" Explanation");

        assert_eq!(next.id, msg.id);
        assert_eq!(next.role, Role::Assistant);
        assert_eq!(next.timestamp, msg.timestamp);
        assert_eq!(next.content, "## Simple Explanation");
        assert_eq!(msg.content, "## Simple");
        assert!(next.is_streaming());
    }

    #[test]
    fn test_frozen_clears_streaming() {
        let msg = Message::streaming_assistant("hi").frozen();
        assert!(!msg.is_streaming());
    }

    #[test]
    fn test_images_skipped_when_empty() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert!(json.get("images").is_none());

        let json =
            serde_json::to_value(Message::user_with_images("", vec!["data:a".into()])).unwrap();
        assert_eq!(json["images"][0], "data:a");
    }
}
