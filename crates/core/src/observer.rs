//! Lookup instrumentation seam.
//!
//! The orchestrator reports cache and fetch outcomes through this trait
//! instead of calling a monitoring backend directly. The default
//! implementation does nothing; deployments wire in their own.

/// Observer for lookup lifecycle events.
///
/// All methods have empty default bodies so implementors only override
/// the events they care about.
pub trait LookupObserver: Send + Sync {
    /// A fresh cache entry satisfied the lookup; no provider call was made.
    fn on_cache_hit(&self) {}

    /// No cache entry existed for the key.
    fn on_cache_miss(&self) {}

    /// A cache entry existed but was past the freshness window.
    fn on_cache_stale(&self) {}

    /// The provider returned a record.
    fn on_fetch_ok(&self) {}

    /// The provider call failed; `kind` is the stable error kind string.
    fn on_fetch_error(&self, kind: &'static str) {
        let _ = kind;
    }

    /// A cache read or write failed (always non-fatal to the lookup).
    fn on_storage_error(&self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LookupObserver for NoopObserver {}
