use std::sync::Arc;

use futures::StreamExt;

use super::backend::ChatBackend;
use super::conversation::Conversation;
use super::error::{ChatError, Result};
use super::types::{ChatRequest, EventStream, MessageId, StreamEvent};
use crate::providers::error::ProviderError;

/// Callback view of one reply stream.
pub trait StreamHandler {
    fn on_delta(&mut self, text: &str);
    fn on_done(&mut self);
    fn on_error(&mut self, error: &ProviderError);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Completed,
    Failed(ProviderError),
}

/// Drives a backend result into `handler`.
///
/// Exactly one of `on_done`/`on_error` fires, and nothing fires after it.
/// A stream that runs dry without a terminal event is treated as done.
pub async fn dispatch<H>(
    result: std::result::Result<EventStream, ProviderError>,
    handler: &mut H,
) -> Terminal
where
    H: StreamHandler + ?Sized,
{
    let mut events = match result {
        Ok(events) => events,
        Err(err) => {
            handler.on_error(&err);
            return Terminal::Failed(err);
        }
    };

    while let Some(event) = events.next().await {
        match event {
            StreamEvent::Delta(text) => handler.on_delta(&text),
            StreamEvent::Done => {
                handler.on_done();
                return Terminal::Completed;
            }
            StreamEvent::Error(err) => {
                handler.on_error(&err);
                return Terminal::Failed(err);
            }
        }
    }

    handler.on_done();
    Terminal::Completed
}

/// Folds deltas of one reply into the conversation.
///
/// Once a terminal callback has been seen, further calls are no-ops.
pub struct ReplyFold<'a, F> {
    conversation: &'a mut Conversation,
    on_delta: F,
    reply_id: Option<MessageId>,
    finished: bool,
}

impl<'a, F: FnMut(&str)> ReplyFold<'a, F> {
    pub const fn new(conversation: &'a mut Conversation, on_delta: F) -> Self {
        Self {
            conversation,
            on_delta,
            reply_id: None,
            finished: false,
        }
    }

    #[must_use]
    pub fn reply_id(&self) -> Option<&MessageId> {
        self.reply_id.as_ref()
    }

    fn finish(&mut self) {
        self.finished = true;
        self.conversation.mark_assistant_done();
    }
}

impl<F: FnMut(&str)> StreamHandler for ReplyFold<'_, F> {
    fn on_delta(&mut self, text: &str) {
        if self.finished {
            tracing::trace!(len = text.len(), "Ignoring delta after terminal event");
            return;
        }
        self.reply_id = Some(self.conversation.begin_or_extend_assistant(text));
        (self.on_delta)(text);
    }

    fn on_done(&mut self) {
        if !self.finished {
            self.finish();
        }
    }

    fn on_error(&mut self, error: &ProviderError) {
        if !self.finished {
            tracing::debug!(error = %error, "Reply failed");
            self.finish();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyOutcome {
    pub user_id: MessageId,
    /// `None` when the reply finished without any text.
    pub reply_id: Option<MessageId>,
}

/// One conversation bound to one backend.
///
/// `submit` takes `&mut self`, so a session never has two replies in flight.
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    conversation: Conversation,
}

impl ChatSession {
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            conversation: Conversation::new(),
        }
    }

    #[must_use]
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    /// Sends a user turn and folds the streamed reply into the conversation,
    /// calling `on_delta` for every fragment as it arrives.
    ///
    /// On failure the user turn, and any partial reply, stay in the
    /// conversation.
    pub async fn submit<F>(
        &mut self,
        text: &str,
        images: Vec<String>,
        on_delta: F,
    ) -> Result<ReplyOutcome>
    where
        F: FnMut(&str),
    {
        let text = text.trim();
        if text.is_empty() && images.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let user_id = self.conversation.append_user(text, images);
        let request = ChatRequest::new(self.conversation.messages().to_vec());

        tracing::debug!(
            backend = self.backend.name(),
            turns = request.messages.len(),
            "Submitting turn"
        );

        let result = self.backend.stream(request).await;
        let mut fold = ReplyFold::new(&mut self.conversation, on_delta);
        let terminal = dispatch(result, &mut fold).await;
        let reply_id = fold.reply_id().cloned();

        match terminal {
            Terminal::Completed => Ok(ReplyOutcome { user_id, reply_id }),
            Terminal::Failed(err) => Err(err.into()),
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("backend", &self.backend.name())
            .field("messages", &self.conversation.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Role;
    use crate::providers::mock::{MockBackend, MockReply};

    #[derive(Default)]
    struct Recorder {
        deltas: Vec<String>,
        done: usize,
        errors: Vec<String>,
    }

    impl StreamHandler for Recorder {
        fn on_delta(&mut self, text: &str) {
            self.deltas.push(text.to_string());
        }

        fn on_done(&mut self) {
            self.done += 1;
        }

        fn on_error(&mut self, error: &ProviderError) {
            self.errors.push(error.to_string());
        }
    }

    fn events(events: Vec<StreamEvent>) -> std::result::Result<EventStream, ProviderError> {
        Ok(Box::pin(futures::stream::iter(events)))
    }

    #[tokio::test]
    async fn test_dispatch_exactly_one_done() {
        let mut rec = Recorder::default();
        let terminal = dispatch(
            events(vec![
                StreamEvent::Delta("a".into()),
                StreamEvent::Done,
                StreamEvent::Delta("late".into()),
                StreamEvent::Done,
            ]),
            &mut rec,
        )
        .await;

        assert_eq!(terminal, Terminal::Completed);
        assert_eq!(rec.deltas, vec!["a"]);
        assert_eq!(rec.done, 1);
        assert!(rec.errors.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_error_stops_callbacks() {
        let mut rec = Recorder::default();
        let terminal = dispatch(
            events(vec![
                StreamEvent::Delta("a".into()),
                StreamEvent::Error(ProviderError::Decode("bad".into())),
                StreamEvent::Delta("b".into()),
                StreamEvent::Done,
            ]),
            &mut rec,
        )
        .await;

        assert!(matches!(terminal, Terminal::Failed(ProviderError::Decode(_))));
        assert_eq!(rec.deltas, vec!["a"]);
        assert_eq!(rec.done, 0);
        assert_eq!(rec.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_rejected_request() {
        let mut rec = Recorder::default();
        let terminal = dispatch(Err(ProviderError::rate_limited("slow down")), &mut rec).await;

        assert_eq!(
            terminal,
            Terminal::Failed(ProviderError::rate_limited("slow down"))
        );
        assert_eq!(rec.errors, vec!["slow down"]);
        assert_eq!(rec.done, 0);
    }

    #[tokio::test]
    async fn test_dispatch_exhausted_stream_is_done() {
        let mut rec = Recorder::default();
        let terminal = dispatch(events(vec![StreamEvent::Delta("x".into())]), &mut rec).await;

        assert_eq!(terminal, Terminal::Completed);
        assert_eq!(rec.done, 1);
    }

    #[test]
    fn test_fold_ignores_deltas_after_error() {
        let mut convo = Conversation::new();
        convo.append_user("q", Vec::new());

        let mut fold = ReplyFold::new(&mut convo, |_: &str| {});
        fold.on_delta("partial");
        fold.on_error(&ProviderError::Network("reset".into()));
        fold.on_delta(" trailing");
        fold.on_done();

        assert_eq!(convo.len(), 2);
        assert_eq!(convo.last().unwrap().content, "partial");
        assert!(!convo.is_streaming());
    }

    #[tokio::test]
    async fn test_submit_streams_reply() {
        let backend = MockBackend::new().with_reply(MockReply::deltas([
            "## Simple",
            " Explanation\n...",
        ]));
        let mut session = ChatSession::new(Arc::new(backend.clone()));

        let mut seen = String::new();
        let outcome = session
            .submit("Explain derivatives", Vec::new(), |d| seen.push_str(d))
            .await
            .unwrap();

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, outcome.user_id);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "## Simple Explanation\n...");
        assert!(!messages[1].is_streaming());
        assert_eq!(outcome.reply_id.as_ref(), Some(&messages[1].id));
        assert_eq!(seen, "## Simple Explanation\n...");

        let sent = &backend.request_history()[0];
        assert_eq!(sent.messages.len(), 1);
        assert_eq!(sent.messages[0].content, "Explain derivatives");
    }

    #[tokio::test]
    async fn test_submit_sends_full_history() {
        let backend = MockBackend::new()
            .with_reply(MockReply::text("first answer"))
            .with_reply(MockReply::text("second answer"));
        let mut session = ChatSession::new(Arc::new(backend.clone()));

        session.submit("one", Vec::new(), |_| {}).await.unwrap();
        session.submit("two", Vec::new(), |_| {}).await.unwrap();

        let sent = &backend.request_history()[1];
        let contents: Vec<&str> = sent.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "first answer", "two"]);
        assert_eq!(session.conversation().len(), 4);
    }

    #[tokio::test]
    async fn test_submit_rate_limited_creates_no_reply() {
        let backend = MockBackend::new().with_reply(MockReply::Reject(ProviderError::from_status(
            429,
            r#"{"error":"Rate limit exceeded. Please wait a moment and try again."}"#,
        )));
        let mut session = ChatSession::new(Arc::new(backend));

        let err = session
            .submit("Explain derivatives", Vec::new(), |_| {})
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Rate limit exceeded. Please wait a moment and try again."
        );
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().messages()[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_submit_mid_stream_error_keeps_partial_reply() {
        let backend = MockBackend::new().with_reply(MockReply::Events(vec![
            StreamEvent::Delta("half".into()),
            StreamEvent::Error(ProviderError::Network("reset".into())),
        ]));
        let mut session = ChatSession::new(Arc::new(backend));

        let result = session.submit("q", Vec::new(), |_| {}).await;

        assert!(matches!(
            result,
            Err(ChatError::Provider(ProviderError::Network(_)))
        ));
        assert_eq!(session.conversation().last().unwrap().content, "half");
        assert!(!session.conversation().is_streaming());
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_turn() {
        let backend = MockBackend::new();
        let mut session = ChatSession::new(Arc::new(backend.clone()));

        let result = session.submit("   ", Vec::new(), |_| {}).await;

        assert!(matches!(result, Err(ChatError::EmptyMessage)));
        assert!(session.conversation().is_empty());
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_image_only_turn() {
        let backend = MockBackend::new().with_reply(MockReply::text("x = 4"));
        let mut session = ChatSession::new(Arc::new(backend.clone()));

        session
            .submit("", vec!["data:image/png;base64,AAAA".into()], |_| {})
            .await
            .unwrap();

        let sent = &backend.request_history()[0];
        assert_eq!(sent.messages[0].images.len(), 1);
    }

    #[test]
    fn test_reset_after_reply() {
        let backend = MockBackend::new().with_reply(MockReply::text("answer"));
        let mut session = ChatSession::new(Arc::new(backend));

        tokio_test::block_on(session.submit("q", Vec::new(), |_| {})).unwrap();
        assert_eq!(session.conversation().len(), 2);

        session.reset();
        assert!(session.conversation().is_empty());
    }
}
