use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use super::error::ProviderError;

#[derive(Clone)]
pub struct ApiKey(Cow<'static, str>);

impl ApiKey {
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.0.len();
        if len > 8 {
            write!(f, "ApiKey({}...{})", &self.0[..4], &self.0[len - 3..])
        } else if len > 0 {
            write!(f, "ApiKey(***)")
        } else {
            write!(f, "ApiKey(<empty>)")
        }
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        Self(Cow::Borrowed(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(Cow<'static, str>);

impl ModelId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<&'static str> for ModelId {
    fn from(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

/// Full URL of the chat endpoint (no path joining happens on it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(Cow<'static, str>);

impl Endpoint {
    pub fn parse(url: impl Into<Cow<'static, str>>) -> Result<Self, ProviderError> {
        let url = url.into();
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::Configuration(
                "No chat endpoint configured".to_string(),
            ));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ProviderError::Configuration(format!(
                "Endpoint must be an http(s) URL: {trimmed}"
            )));
        }
        let trimmed = trimmed.trim_end_matches('/');
        Ok(Self(Cow::Owned(trimmed.to_string())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_debug_redacts() {
        let key = ApiKey::new("sk-abcdefghijklmnop");
        let debug = format!("{key:?}");
        assert!(debug.starts_with("ApiKey(sk-a"));
        assert!(!debug.contains("efghijkl"));

        assert_eq!(format!("{:?}", ApiKey::new("short")), "ApiKey(***)");
        assert_eq!(format!("{:?}", ApiKey::default()), "ApiKey(<empty>)");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let endpoint = Endpoint::parse("https://example.supabase.co/functions/v1/chat/").unwrap();
        assert_eq!(
            endpoint.as_str(),
            "https://example.supabase.co/functions/v1/chat"
        );
    }

    #[test]
    fn test_endpoint_rejects_empty_and_non_http() {
        assert!(matches!(
            Endpoint::parse(""),
            Err(ProviderError::Configuration(_))
        ));
        assert!(matches!(
            Endpoint::parse("ftp://example.com"),
            Err(ProviderError::Configuration(_))
        ));
    }

    #[test]
    fn test_model_id_from_str() {
        let model = ModelId::from("google/gemini-2.5-flash");
        assert_eq!(model.to_string(), "google/gemini-2.5-flash");
    }
}
