//! Provider API client error types.

use std::sync::Arc;

/// Errors from the property-data provider client.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No provider API key configured.
    #[error("missing API key: provider credential not configured")]
    MissingApiKey,

    /// Invalid lookup address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The provider returned zero matching records.
    #[error("no property matched the address")]
    NotFound,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    Auth,

    /// Rate limited by the provider.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = ProviderError::Http { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}
