//! Core types and shared functionality for plat.
//!
//! This crate provides:
//! - Property cache with SQLite backend
//! - Unified error types
//! - Layered application configuration
//! - The normalized property record and the lookup observer seam

pub mod cache;
pub mod config;
pub mod error;
pub mod observer;
pub mod property;

pub use cache::{CacheDb, CacheStats, CachedProperty};
pub use config::{AppConfig, OwnerOverride};
pub use error::Error;
pub use observer::{LookupObserver, NoopObserver};
pub use property::{AssessedValue, TransformedProperty};
