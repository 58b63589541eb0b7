pub mod config;
pub mod convert;
pub mod stream;
pub mod types;

use async_trait::async_trait;

use crate::core::backend::ChatBackend;
use crate::core::types::{ChatRequest, EventStream};
use crate::providers::error::ProviderError;
use crate::providers::http::{HttpClient, HttpConfig};

pub use config::{ClientConfig, EndpointMode};
pub use stream::decode_events;

/// Streams replies from the study proxy (or an OpenAI-compatible gateway).
#[derive(Clone)]
pub struct ProxyClient {
    http: HttpClient,
    config: ClientConfig,
}

impl std::fmt::Debug for ProxyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("gateway", &self.config.is_gateway())
            .finish_non_exhaustive()
    }
}

impl ProxyClient {
    pub fn new(config: ClientConfig) -> Result<Self, ProviderError> {
        Self::with_http_config(config, HttpConfig::default())
    }

    pub fn with_http_config(
        config: ClientConfig,
        http_config: HttpConfig,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: HttpClient::with_config(http_config)?,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn parse_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        ProviderError::from_status(status.as_u16(), body)
    }
}

fn is_event_stream(headers: &reqwest::header::HeaderMap) -> bool {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("text/event-stream"))
}

#[async_trait]
impl ChatBackend for ProxyClient {
    fn name(&self) -> &str {
        if self.config.is_gateway() {
            "gateway"
        } else {
            "proxy"
        }
    }

    async fn stream(&self, request: ChatRequest) -> Result<EventStream, ProviderError> {
        let api_request = convert::to_api_request(&self.config, &request);
        let url = self.config.endpoint.as_str();

        tracing::debug!(
            endpoint = %url,
            turns = api_request.messages.len(),
            "Sending chat request"
        );

        let response = self
            .http
            .post(url, &self.config.auth)
            .header("accept", "text/event-stream")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let err = Self::parse_error(status, &error_body);
            tracing::warn!(status = status.as_u16(), error = %err, "Chat request failed");
            return Err(err);
        }

        // A success status without an event stream is an error page or an
        // error object from the proxy, never a reply.
        if !is_event_stream(response.headers()) {
            let error_body = response.text().await.unwrap_or_default();
            let err = Self::parse_error(status, &error_body);
            tracing::warn!(
                status = status.as_u16(),
                error = %err,
                "Success response is not an event stream"
            );
            return Err(err);
        }

        let byte_stream = Box::pin(response.bytes_stream());
        Ok(Box::pin(decode_events(byte_stream)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::{ApiKey, Endpoint};

    fn endpoint() -> Endpoint {
        Endpoint::parse("https://example.supabase.co/functions/v1/chat").unwrap()
    }

    #[test]
    fn test_client_name_follows_mode() {
        let proxy = ProxyClient::new(ClientConfig::proxy(endpoint())).expect("client");
        assert_eq!(proxy.name(), "proxy");

        let gateway = ProxyClient::new(ClientConfig::gateway(endpoint(), ApiKey::new("k")))
            .expect("client");
        assert_eq!(gateway.name(), "gateway");
    }

    #[test]
    fn test_client_debug_hides_key() {
        let client = ProxyClient::new(ClientConfig::gateway(
            endpoint(),
            ApiKey::new("secret-key-123456"),
        ))
        .expect("client");

        let debug = format!("{client:?}");
        assert!(debug.contains("ProxyClient"));
        assert!(debug.contains("functions/v1/chat"));
        assert!(!debug.contains("secret-key-123456"));
    }

    #[test]
    fn test_parse_error_429() {
        let body = r#"{"error": "Rate limit exceeded. Please wait a moment and try again."}"#;
        let err = ProxyClient::parse_error(reqwest::StatusCode::TOO_MANY_REQUESTS, body);

        assert!(matches!(err, ProviderError::RateLimited(_)));
    }

    #[test]
    fn test_event_stream_content_types() {
        use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

        let with = |value: &'static str| {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
            headers
        };

        assert!(is_event_stream(&with("text/event-stream")));
        assert!(is_event_stream(&with("text/event-stream; charset=utf-8")));
        assert!(is_event_stream(&with("Text/Event-Stream")));
        assert!(!is_event_stream(&with("application/json")));
        assert!(!is_event_stream(&with("text/html")));
        assert!(!is_event_stream(&HeaderMap::new()));
    }

    #[test]
    fn test_parse_error_success_status_keeps_error_text() {
        let body = r#"{"error": "LOVABLE_API_KEY is not configured"}"#;
        let err = ProxyClient::parse_error(reqwest::StatusCode::OK, body);

        assert_eq!(err, ProviderError::upstream(200, "LOVABLE_API_KEY is not configured"));
    }

    #[test]
    fn test_parse_error_402() {
        let body = r#"{"error": "AI usage limit reached. Please add credits to continue."}"#;
        let err = ProxyClient::parse_error(reqwest::StatusCode::PAYMENT_REQUIRED, body);

        assert!(matches!(err, ProviderError::QuotaExhausted(_)));
    }
}
