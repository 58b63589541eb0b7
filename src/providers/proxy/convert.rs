use crate::core::types::{ChatRequest, Message, Role};
use crate::providers::error::{ProviderError, error_from_value};
use crate::providers::http::sse::SseFrame;

use super::config::ClientConfig;
use super::types::{
    ChatCompletionChunk, ChatCompletionRequest, ContentPart, ImageUrl, MessageContent, WireMessage,
};

pub const IMAGE_HISTORY_PROMPT: &str = "Analyze this image";
pub const IMAGE_LATEST_PROMPT: &str = "Analyze this image and solve it step by step";

pub fn to_api_request(config: &ClientConfig, request: &ChatRequest) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(system_prompt) = &config.system_prompt {
        messages.push(WireMessage {
            role: "system".to_string(),
            content: MessageContent::Text(system_prompt.clone()),
        });
    }

    messages.extend(to_wire_messages(&request.messages));

    ChatCompletionRequest {
        model: config.model.as_ref().map(|m| m.as_str().to_string()),
        messages,
        stream: config.is_gateway().then_some(true),
    }
}

/// Converts the conversation into wire turns. Image turns become part
/// lists with every image ahead of the text that describes them.
#[must_use]
pub fn to_wire_messages(messages: &[Message]) -> Vec<WireMessage> {
    let last = messages.len().saturating_sub(1);
    messages
        .iter()
        .enumerate()
        .map(|(i, msg)| to_wire_message(msg, i == last))
        .collect()
}

fn to_wire_message(message: &Message, is_latest: bool) -> WireMessage {
    let content = if message.has_images() {
        let fallback = if is_latest && message.role == Role::User {
            IMAGE_LATEST_PROMPT
        } else {
            IMAGE_HISTORY_PROMPT
        };
        let text = if message.content.is_empty() {
            fallback.to_string()
        } else {
            message.content.clone()
        };

        let mut parts: Vec<ContentPart> = message
            .images
            .iter()
            .map(|url| ContentPart::ImageUrl {
                image_url: ImageUrl { url: url.clone() },
            })
            .collect();
        parts.push(ContentPart::Text { text });
        MessageContent::Parts(parts)
    } else {
        MessageContent::Text(message.content.clone())
    };

    WireMessage {
        role: message.role.as_str().to_string(),
        content,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Delta(String),
    Done,
    Skip,
}

/// Validates one frame payload. Anything that is not the terminator or a
/// chat-completion chunk object is rejected.
pub fn parse_frame(frame: &SseFrame) -> Result<Frame, ProviderError> {
    if frame.is_done() {
        return Ok(Frame::Done);
    }

    let data = frame.data.trim();
    if data.is_empty() {
        return Ok(Frame::Skip);
    }

    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| ProviderError::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(ProviderError::Decode(format!(
            "expected a JSON object, got `{}`",
            truncate(data, 40)
        )));
    }

    if let Some(message) = error_from_value(&value) {
        return Err(ProviderError::Upstream {
            status: None,
            message,
        });
    }

    let chunk: ChatCompletionChunk =
        serde_json::from_value(value).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let text = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|text| !text.is_empty());

    Ok(text.map_or(Frame::Skip, Frame::Delta))
}

fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
