//! Client code for plat.
//!
//! This crate provides the property-data provider client, the response
//! transformer, and the lookup orchestrator that composes them with the
//! cache in plat-core.

pub mod lookup;
pub mod provider;
pub mod transform;

pub use lookup::{DeferredSource, Lookup, LookupService, PropertySource};
pub use provider::{ProviderClient, ProviderConfig, ProviderError, RawProviderProperty};
pub use transform::{OwnerOverrides, transform};
