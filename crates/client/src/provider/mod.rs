//! Property-data provider API client.
//!
//! Fetches a single best-match property record for a street address.
//!
//! ### Specification
//!
//! - **Endpoint**: `GET {base_url}/properties?address=...&limit=1`
//! - **Authentication**: `X-Api-Key` header; the key comes from an explicit
//!   `ProviderConfig`, never from ambient process state.
//! - **Classification**: 401/403 map to `Auth`, 404 and empty result sets
//!   map to `NotFound`, 429 to `RateLimited`, any other non-2xx to
//!   `Http { status }`. No retries here; each failure is terminal for the
//!   request.
//!
//! The raw (non-normalized) address is sent to the provider: key
//! normalization is purely a cache concern.

pub mod error;
pub mod response;

pub use error::ProviderError;
pub use response::RawProviderProperty;

use plat_core::AppConfig;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the provider API.
const DEFAULT_BASE_URL: &str = "https://api.rentcast.io/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "plat/0.1";

/// Provider API client configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider API key.
    pub api_key: String,
    /// Base URL (default: https://api.rentcast.io/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: plat/0.x).
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Build a provider configuration from the application config.
    ///
    /// Fails with `MissingApiKey` when no credential is configured, which
    /// callers surface as a server configuration problem rather than a
    /// client input problem.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .require_provider_api_key()
            .map_err(|_| ProviderError::MissingApiKey)?
            .to_string();

        Ok(Self {
            api_key,
            base_url: config.provider_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Property-data provider API client.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl ProviderClient {
    /// Create a new provider client with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Fetch the single best-match property record for an address.
    pub async fn fetch_by_address(&self, address: &str) -> Result<RawProviderProperty, ProviderError> {
        if address.trim().is_empty() {
            return Err(ProviderError::InvalidAddress("address cannot be empty".to_string()));
        }

        let start = Instant::now();
        let url = format!("{}/properties", self.config.base_url);

        tracing::debug!("querying provider: address={}", address);

        let http_response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&[("address", address), ("limit", "1")])
            .send()
            .await
            .map_err(
                |e| {
                    if e.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(e)) }
                },
            )?;

        let status = http_response.status();
        tracing::debug!("provider response status: {}", status);

        if status == 401 || status == 403 {
            return Err(ProviderError::Auth);
        }

        if status == 404 {
            return Err(ProviderError::NotFound);
        }

        if status == 429 {
            return Err(ProviderError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ProviderError::Http { status: status.as_u16() });
        }

        let bytes = http_response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(Arc::new(e)))?;
        let records: Vec<RawProviderProperty> =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))?;

        tracing::debug!("provider lookup completed in {:?}, {} records", start.elapsed(), records.len());

        records.into_iter().next().ok_or(ProviderError::NotFound)
    }
}
