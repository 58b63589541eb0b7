use async_trait::async_trait;

use super::types::{ChatRequest, EventStream};
use crate::providers::error::ProviderError;

/// Anything that can turn a conversation history into a reply stream.
///
/// `Err` means the attempt failed before any event was produced. A returned
/// stream yields deltas followed by exactly one terminal event.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn name(&self) -> &str;
    async fn stream(&self, request: ChatRequest) -> Result<EventStream, ProviderError>;
}
