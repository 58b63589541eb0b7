pub mod auth;
pub mod sse;

pub use auth::AuthStrategy;
pub use sse::SseParser;

use reqwest::Client;
use std::time::Duration;

use crate::providers::error::ProviderError;

/// Transport settings. With no timeout set, reqwest's defaults apply and a
/// stream runs until the server closes it.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl HttpConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn with_config(config: HttpConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua);
        }

        let inner = builder.build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self { inner, config })
    }

    #[must_use]
    pub fn post(&self, url: &str, auth: &AuthStrategy) -> reqwest::RequestBuilder {
        auth.apply(self.inner.post(url))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
