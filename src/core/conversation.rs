use super::types::{Message, MessageId, Role};

/// Ordered, in-memory conversation. Insertion order is display order.
///
/// At most one assistant message is streaming at a time and, when present,
/// it is the last element.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.messages.last().is_some_and(Message::is_streaming)
    }

    /// Appends a user turn. A still-streaming reply is frozen first.
    pub fn append_user(&mut self, text: impl Into<String>, images: Vec<String>) -> MessageId {
        self.mark_assistant_done();

        let message = Message::user_with_images(text, images);
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Extends the streaming assistant message, or opens a new one seeded
    /// with `delta` when the trailing message is not a streaming reply.
    pub fn begin_or_extend_assistant(&mut self, delta: &str) -> MessageId {
        if let Some(index) = self.streaming_index() {
            let updated = self.messages[index].extended(delta);
            let id = updated.id.clone();
            self.messages[index] = updated;
            return id;
        }

        let message = Message::streaming_assistant(delta);
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Freezes the trailing assistant message. Returns its id if one was
    /// streaming.
    pub fn mark_assistant_done(&mut self) -> Option<MessageId> {
        let index = self.streaming_index()?;
        let frozen = self.messages[index].clone().frozen();
        let id = frozen.id.clone();
        self.messages[index] = frozen;
        Some(id)
    }

    pub fn reset(&mut self) {
        self.messages.clear();
    }

    fn streaming_index(&self) -> Option<usize> {
        let index = self.messages.len().checked_sub(1)?;
        let last = &self.messages[index];
        (last.role == Role::Assistant && last.is_streaming()).then_some(index)
    }
}
