//! Lookup orchestration: cache, then fetch.
//!
//! A lookup consults the cache first and returns immediately on a fresh
//! hit; otherwise it fetches from the provider, transforms, and persists
//! best-effort. Storage failures never fail a lookup (the system degrades
//! to always-fetch); provider failures are classified into the unified
//! taxonomy and surfaced without retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plat_core::cache::is_fresh;
use plat_core::{AppConfig, CacheDb, Error, LookupObserver, NoopObserver, TransformedProperty};
use serde::Serialize;
use std::sync::Arc;

use crate::provider::{ProviderClient, ProviderConfig, ProviderError, RawProviderProperty};
use crate::transform::{OwnerOverrides, transform};

/// Source of raw property records.
///
/// Seam between the orchestrator and the provider client so lookups can be
/// exercised without network I/O.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch the single best-match record for an address.
    async fn fetch_by_address(&self, address: &str) -> Result<RawProviderProperty, ProviderError>;
}

#[async_trait]
impl PropertySource for ProviderClient {
    async fn fetch_by_address(&self, address: &str) -> Result<RawProviderProperty, ProviderError> {
        ProviderClient::fetch_by_address(self, address).await
    }
}

/// Source that builds the provider client on first use.
///
/// The credential is resolved inside the fetch step, not up front, so a
/// lookup satisfied from the cache never needs one.
#[derive(Debug, Clone)]
pub struct DeferredSource {
    config: AppConfig,
}

impl DeferredSource {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PropertySource for DeferredSource {
    async fn fetch_by_address(&self, address: &str) -> Result<RawProviderProperty, ProviderError> {
        let client = ProviderClient::new(ProviderConfig::from_app_config(&self.config)?)?;
        client.fetch_by_address(address).await
    }
}

/// Outcome of a lookup: the property plus where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    pub property: TransformedProperty,
    pub cached: bool,
    /// Timestamp of the cache write that satisfied this lookup; absent on
    /// the freshly fetched path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<DateTime<Utc>>,
}

/// Per-request lookup orchestrator.
pub struct LookupService<S = ProviderClient> {
    db: CacheDb,
    source: S,
    overrides: OwnerOverrides,
    observer: Arc<dyn LookupObserver>,
    max_age_hours: i64,
}

impl<S: PropertySource> LookupService<S> {
    /// Create a lookup service with the default freshness window (24h),
    /// no owner overrides, and a no-op observer.
    pub fn new(db: CacheDb, source: S) -> Self {
        Self { db, source, overrides: OwnerOverrides::default(), observer: Arc::new(NoopObserver), max_age_hours: 24 }
    }

    /// Replace the owner-override table.
    pub fn with_overrides(mut self, overrides: OwnerOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the no-op observer.
    pub fn with_observer(mut self, observer: Arc<dyn LookupObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Override the freshness window.
    pub fn with_max_age_hours(mut self, hours: i64) -> Self {
        self.max_age_hours = hours;
        self
    }

    /// Look up a property by address.
    ///
    /// Fresh cache hits return without any provider call. On a miss or a
    /// stale entry the provider is called once, the response transformed,
    /// and the result persisted best-effort before being returned.
    pub async fn lookup(&self, address: &str) -> Result<Lookup, Error> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::InvalidInput("address cannot be empty".to_string()));
        }

        match self.db.get_property(address).await {
            Ok(Some(hit)) if is_fresh(hit.updated_at, self.max_age_hours) => {
                tracing::debug!("cache hit for address: {}", address);
                self.observer.on_cache_hit();
                return Ok(Lookup { property: hit.payload, cached: true, cached_at: Some(hit.updated_at) });
            }
            Ok(Some(hit)) => {
                tracing::debug!("stale cache entry for address: {} (written {})", address, hit.updated_at);
                self.observer.on_cache_stale();
            }
            Ok(None) => {
                tracing::debug!("cache miss for address: {}", address);
                self.observer.on_cache_miss();
            }
            Err(e) => {
                // Degrade to always-fetch; a cache-read failure must never
                // block the fetch path.
                tracing::warn!("cache read failed, treating as miss: {}", e);
                self.observer.on_storage_error();
            }
        }

        let raw = match self.source.fetch_by_address(address).await {
            Ok(raw) => {
                self.observer.on_fetch_ok();
                raw
            }
            Err(e) => {
                let err = classify(e);
                self.observer.on_fetch_error(err.kind());
                return Err(err);
            }
        };

        let property = transform(&raw, &self.overrides);

        if let Err(e) = self.db.put_property(address, &property).await {
            // The freshly fetched result is still valid output.
            tracing::warn!("failed to cache property: {}", e);
            self.observer.on_storage_error();
        }

        Ok(Lookup { property, cached: false, cached_at: None })
    }
}

/// Map provider failures into the unified taxonomy.
fn classify(err: ProviderError) -> Error {
    match err {
        ProviderError::MissingApiKey => Error::Config(err.to_string()),
        ProviderError::InvalidAddress(msg) => Error::InvalidInput(msg),
        ProviderError::NotFound => Error::NotFound(err.to_string()),
        ProviderError::Auth => Error::Auth(err.to_string()),
        ProviderError::RateLimited
        | ProviderError::Http { .. }
        | ProviderError::Timeout
        | ProviderError::Network(_)
        | ProviderError::Parse(_) => Error::Upstream(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plat_core::property::PropertyOwner;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum MockBehavior {
        Found(Box<RawProviderProperty>),
        NotFound,
        MissingApiKey,
        Unreachable,
    }

    struct MockSource {
        behavior: MockBehavior,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(behavior: MockBehavior) -> Self {
            Self { behavior, calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PropertySource for &MockSource {
        async fn fetch_by_address(&self, _address: &str) -> Result<RawProviderProperty, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                MockBehavior::Found(raw) => Ok((**raw).clone()),
                MockBehavior::NotFound => Err(ProviderError::NotFound),
                MockBehavior::MissingApiKey => Err(ProviderError::MissingApiKey),
                MockBehavior::Unreachable => panic!("provider must not be called"),
            }
        }
    }

    fn beltsville_record() -> RawProviderProperty {
        RawProviderProperty {
            id: Some("11760-Baltimore-Ave,-Beltsville,-MD-20705".to_string()),
            formatted_address: Some("11760 Baltimore Ave, Beltsville, MD 20705".to_string()),
            address_line1: Some("11760 Baltimore Ave".to_string()),
            city: Some("Beltsville".to_string()),
            state: Some("MD".to_string()),
            zip_code: Some("20705".to_string()),
            owner: Some(PropertyOwner { names: Some(vec!["Jane Doe".to_string()]), owner_type: None }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_address_rejected_before_any_io() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let source = MockSource::new(MockBehavior::Unreachable);
        let service = LookupService::new(db, &source);

        let result = service.lookup("   ").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_then_fresh_hit_skips_provider() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let source = MockSource::new(MockBehavior::Found(Box::new(beltsville_record())));
        let service = LookupService::new(db.clone(), &source);

        let first = service
            .lookup("11760 Baltimore Ave, Beltsville, MD 20705")
            .await
            .unwrap();
        assert!(!first.cached);
        assert!(first.cached_at.is_none());
        assert_eq!(first.property.owner_name, "Jane Doe");
        assert_eq!(source.calls(), 1);

        let stored = db
            .get_property("11760 Baltimore Ave, Beltsville, MD 20705")
            .await
            .unwrap()
            .unwrap();

        // Case variant of the same address within the freshness window.
        let second = service
            .lookup("  11760 BALTIMORE AVE, BELTSVILLE, MD 20705  ")
            .await
            .unwrap();
        assert!(second.cached);
        assert_eq!(second.cached_at, Some(stored.updated_at));
        assert_eq!(second.property, first.property);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_refetch() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let source = MockSource::new(MockBehavior::Found(Box::new(beltsville_record())));

        let service = LookupService::new(db.clone(), &source);
        service.lookup("11760 Baltimore Ave").await.unwrap();
        assert_eq!(source.calls(), 1);

        // A zero-hour window makes every entry stale.
        let impatient = LookupService::new(db, &source).with_max_age_hours(0);
        let refetched = impatient.lookup("11760 Baltimore Ave").await.unwrap();
        assert!(!refetched.cached);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_not_found_creates_no_cache_entry() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let source = MockSource::new(MockBehavior::NotFound);
        let service = LookupService::new(db.clone(), &source);

        let result = service.lookup("1 Nowhere Ln").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(db.get_property("1 Nowhere Ln").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_surfaces_as_config_error() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let source = MockSource::new(MockBehavior::MissingApiKey);
        let service = LookupService::new(db, &source);

        let result = service.lookup("11760 Baltimore Ave").await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_fetch() {
        #[derive(Default)]
        struct StorageErrors(AtomicUsize);

        impl LookupObserver for StorageErrors {
            fn on_storage_error(&self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let db = CacheDb::open_in_memory().await.unwrap();
        // Closing one clone shuts the shared background connection, so
        // every subsequent cache call errors.
        db.clone().close().await.unwrap();

        let source = MockSource::new(MockBehavior::Found(Box::new(beltsville_record())));
        let observer = Arc::new(StorageErrors::default());
        let service = LookupService::new(db, &source).with_observer(observer.clone());

        let result = service.lookup("11760 Baltimore Ave").await.unwrap();
        assert!(!result.cached);
        assert_eq!(result.property.owner_name, "Jane Doe");
        assert_eq!(source.calls(), 1);
        // Both the failed probe and the failed persist are reported.
        assert_eq!(observer.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_observer_sees_hit_and_miss() {
        #[derive(Default)]
        struct CountingObserver {
            hits: AtomicUsize,
            misses: AtomicUsize,
        }

        impl LookupObserver for CountingObserver {
            fn on_cache_hit(&self) {
                self.hits.fetch_add(1, Ordering::SeqCst);
            }
            fn on_cache_miss(&self) {
                self.misses.fetch_add(1, Ordering::SeqCst);
            }
        }

        let db = CacheDb::open_in_memory().await.unwrap();
        let source = MockSource::new(MockBehavior::Found(Box::new(beltsville_record())));
        let observer = Arc::new(CountingObserver::default());
        let service = LookupService::new(db, &source).with_observer(observer.clone());

        service.lookup("11760 Baltimore Ave").await.unwrap();
        service.lookup("11760 Baltimore Ave").await.unwrap();

        assert_eq!(observer.misses.load(Ordering::SeqCst), 1);
        assert_eq!(observer.hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_classify_upstream_statuses() {
        assert!(matches!(classify(ProviderError::NotFound), Error::NotFound(_)));
        assert!(matches!(classify(ProviderError::Auth), Error::Auth(_)));
        assert!(matches!(classify(ProviderError::MissingApiKey), Error::Config(_)));
        assert!(matches!(classify(ProviderError::RateLimited), Error::Upstream(_)));
        assert!(matches!(classify(ProviderError::Http { status: 503 }), Error::Upstream(_)));
        assert!(matches!(classify(ProviderError::Timeout), Error::Upstream(_)));
    }
}
