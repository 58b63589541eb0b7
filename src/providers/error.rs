use thiserror::Error;

pub const RATE_LIMIT_FALLBACK: &str = "Rate limit exceeded. Please wait a moment and try again.";
pub const QUOTA_FALLBACK: &str = "AI usage limit reached. Please add credits to continue.";
pub const UPSTREAM_FALLBACK: &str = "AI service error. Please try again.";

/// Every way a single reply attempt can fail. All kinds are terminal for
/// the attempt; none is retried here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Could not reach the AI: {0}")]
    Network(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    QuotaExhausted(String),

    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed stream frame: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited(message.into())
    }

    #[must_use]
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited(_) => Some(429),
            Self::QuotaExhausted(_) => Some(402),
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Classifies a non-success response. The body's `error` string is kept
    /// verbatim; both `{"error": "..."}` and `{"error": {"message": "..."}}`
    /// are understood.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);

        match status {
            429 => Self::rate_limited(message.unwrap_or_else(|| RATE_LIMIT_FALLBACK.to_string())),
            402 => Self::QuotaExhausted(message.unwrap_or_else(|| QUOTA_FALLBACK.to_string())),
            _ => Self::upstream(
                status,
                message.unwrap_or_else(|| UPSTREAM_FALLBACK.to_string()),
            ),
        }
    }
}

pub(crate) fn error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    error_from_value(&value)
}

pub(crate) fn error_from_value(value: &serde_json::Value) -> Option<String> {
    let error = value.get("error")?;
    error
        .as_str()
        .or_else(|| error.get("message")?.as_str())
        .map(String::from)
}
