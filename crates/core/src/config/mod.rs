//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PLAT_*)
//! 2. TOML config file (if PLAT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// A configured owner-name correction.
///
/// Matched against the provider record id or formatted address (both
/// normalized). Data correction, not transform logic: ships empty and is
/// populated per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerOverride {
    /// Provider record id or formatted address to match.
    pub address: String,
    /// Owner name to report instead of the provider's.
    pub owner_name: String,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PLAT_*)
/// 2. TOML config file (if PLAT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider API key for property lookups.
    ///
    /// Set via PLAT_PROVIDER_API_KEY environment variable.
    /// Required only when a lookup has to reach the provider.
    #[serde(default)]
    pub provider_api_key: Option<String>,

    /// Provider API base URL.
    ///
    /// Set via PLAT_PROVIDER_BASE_URL environment variable.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Path to SQLite cache database.
    ///
    /// Set via PLAT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to.
    ///
    /// Set via PLAT_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// User-Agent string for provider requests.
    ///
    /// Set via PLAT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Provider request timeout in milliseconds.
    ///
    /// Set via PLAT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Hours a cached record stays fresh before a lookup refetches it.
    ///
    /// Set via PLAT_CACHE_MAX_AGE_HOURS environment variable.
    #[serde(default = "default_cache_max_age_hours")]
    pub cache_max_age_hours: i64,

    /// Days after which the sweep deletes an entry.
    ///
    /// Set via PLAT_SWEEP_RETENTION_DAYS environment variable.
    #[serde(default = "default_sweep_retention_days")]
    pub sweep_retention_days: i64,

    /// Owner-name corrections applied during transformation.
    ///
    /// Configured via TOML file only (no env representation).
    #[serde(default)]
    pub owner_overrides: Vec<OwnerOverride>,
}

fn default_provider_base_url() -> String {
    "https://api.rentcast.io/v1".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./plat-cache.sqlite")
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_user_agent() -> String {
    "plat/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_cache_max_age_hours() -> i64 {
    24
}

fn default_sweep_retention_days() -> i64 {
    90
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider_api_key: None,
            provider_base_url: default_provider_base_url(),
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_max_age_hours: default_cache_max_age_hours(),
            sweep_retention_days: default_sweep_retention_days(),
            owner_overrides: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PLAT_`
    /// 2. TOML file from `PLAT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PLAT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PLAT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the provider API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the provider API key is not set.
    pub fn require_provider_api_key(&self) -> Result<&str, ConfigError> {
        self.provider_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "provider_api_key".into(),
            hint: "Set PLAT_PROVIDER_API_KEY environment variable".into(),
        })
    }
}
