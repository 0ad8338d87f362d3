//! SQLite-backed cache of fetched property records.
//!
//! This module provides a persistent, address-keyed cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Normalized-address keys (trimmed, lower-cased)
//! - Access statistics maintained atomically on the read path
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Age-based retention sweep, decoupled from read/write traffic

pub mod connection;
pub mod key;
pub mod migrations;
pub mod properties;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::normalize_address;
pub use properties::{CacheStats, CachedProperty, is_fresh};
