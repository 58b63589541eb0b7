use serde::{Deserialize, Serialize};

use crate::core::prompt::SYSTEM_PROMPT;
use crate::providers::http::AuthStrategy;
use crate::providers::types::{ApiKey, Endpoint, ModelId};

pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-2.5-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMode {
    /// Endpoint is the study proxy; it adds the system turn.
    #[default]
    Proxy,
    /// Endpoint is an OpenAI-compatible chat-completions API.
    Gateway,
}

/// How the client talks to its endpoint.
///
/// A proxy receives only `{messages}` and adds the system turn itself. A
/// gateway is an OpenAI-compatible chat-completions endpoint, so the client
/// supplies the system turn, the model and the stream flag.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    pub mode: EndpointMode,
    pub auth: AuthStrategy,
    pub model: Option<ModelId>,
    pub system_prompt: Option<String>,
}

impl ClientConfig {
    #[must_use]
    pub const fn proxy(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            mode: EndpointMode::Proxy,
            auth: AuthStrategy::None,
            model: None,
            system_prompt: None,
        }
    }

    #[must_use]
    pub fn gateway(endpoint: Endpoint, api_key: ApiKey) -> Self {
        Self {
            endpoint,
            mode: EndpointMode::Gateway,
            auth: AuthStrategy::bearer(api_key),
            model: Some(ModelId::from(DEFAULT_GATEWAY_MODEL)),
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthStrategy) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<ModelId>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub const fn is_gateway(&self) -> bool {
        matches!(self.mode, EndpointMode::Gateway)
    }
}
