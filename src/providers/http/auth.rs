use crate::providers::types::ApiKey;
use reqwest::RequestBuilder;

/// Credentials attached to every chat request.
#[derive(Clone)]
pub enum AuthStrategy {
    Bearer(ApiKey),
    None,
}

impl AuthStrategy {
    #[must_use]
    pub const fn bearer(key: ApiKey) -> Self {
        Self::Bearer(key)
    }

    /// Bearer when a non-empty key is given, otherwise no auth at all.
    #[must_use]
    pub fn from_optional_key(key: Option<ApiKey>) -> Self {
        match key {
            Some(key) if !key.is_empty() => Self::Bearer(key),
            _ => Self::None,
        }
    }

    #[must_use]
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Bearer(key) => request.bearer_auth(key.as_str()),
            Self::None => request,
        }
    }
}

impl std::fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(key) => f.debug_tuple("Bearer").field(key).finish(),
            Self::None => f.write_str("None"),
        }
    }
}
