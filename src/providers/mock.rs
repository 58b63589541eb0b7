#![allow(clippy::expect_used)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::core::backend::ChatBackend;
use crate::core::types::{ChatRequest, EventStream, StreamEvent};
use crate::providers::error::ProviderError;

/// What a `MockBackend` does for one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Emits these events verbatim, in order.
    Events(Vec<StreamEvent>),
    /// Fails before any event, like a non-success HTTP status.
    Reject(ProviderError),
}

impl MockReply {
    #[must_use]
    pub fn deltas<I, T>(deltas: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut events: Vec<StreamEvent> = deltas
            .into_iter()
            .map(|d| StreamEvent::Delta(d.into()))
            .collect();
        events.push(StreamEvent::Done);
        Self::Events(events)
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::deltas([text.into()])
    }
}

/// Scripted backend for tests.
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<Mutex<Vec<MockReply>>>,
    request_history: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .expect("MockBackend mutex poisoned")
            .push(reply);
        self
    }

    #[must_use]
    pub fn request_history(&self) -> Vec<ChatRequest> {
        self.request_history
            .lock()
            .expect("MockBackend mutex poisoned")
            .clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_history
            .lock()
            .expect("MockBackend mutex poisoned")
            .len()
    }

    fn next_reply(&self) -> Result<MockReply, ProviderError> {
        let mut replies = self.replies.lock().expect("MockBackend mutex poisoned");
        if replies.is_empty() {
            Err(ProviderError::Upstream {
                status: None,
                message: "MockBackend: no replies queued".to_string(),
            })
        } else {
            Ok(replies.remove(0))
        }
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream(&self, request: ChatRequest) -> Result<EventStream, ProviderError> {
        self.request_history
            .lock()
            .expect("MockBackend mutex poisoned")
            .push(request);

        match self.next_reply()? {
            MockReply::Events(events) => Ok(Box::pin(futures::stream::iter(events))),
            MockReply::Reject(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Message;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_replays_events() {
        let backend = MockBackend::new().with_reply(MockReply::deltas(["a", "b"]));

        let stream = backend
            .stream(ChatRequest::new(vec![Message::user("hi")]))
            .await
            .unwrap();
        let events: Vec<_> = stream.collect().await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("a".into()),
                StreamEvent::Delta("b".into()),
                StreamEvent::Done
            ]
        );
        assert_eq!(backend.request_count(), 1);
        assert_eq!(backend.request_history()[0].messages[0].content, "hi");
    }

    #[tokio::test]
    async fn test_mock_reject_and_exhaustion() {
        let backend =
            MockBackend::new().with_reply(MockReply::Reject(ProviderError::rate_limited("wait")));

        let first = backend.stream(ChatRequest::new(vec![])).await;
        assert!(matches!(first, Err(ProviderError::RateLimited(_))));

        let second = backend.stream(ChatRequest::new(vec![])).await;
        assert!(second.is_err());
    }
}
