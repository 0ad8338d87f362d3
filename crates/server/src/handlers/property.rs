use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use plat_client::lookup::{DeferredSource, Lookup, LookupService};
use plat_client::transform::OwnerOverrides;
use plat_core::Error;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct PropertyQuery {
    pub address: Option<String>,
}

/// GET /api/property?address=...
///
/// Serves a fresh cache entry when one exists, otherwise fetches from the
/// provider and persists the result. The provider credential is resolved
/// inside the fetch step, so cached lookups succeed without one.
#[instrument(skip(state), name = "api_property")]
pub async fn lookup_property(
    State(state): State<AppState>,
    Query(params): Query<PropertyQuery>,
) -> Result<Json<Lookup>, ApiError> {
    let address = params.address.as_deref().unwrap_or("").trim();
    if address.is_empty() {
        return Err(Error::InvalidInput("Address is required".to_string()).into());
    }

    let service = LookupService::new(state.db.clone(), DeferredSource::new(state.config.clone()))
        .with_overrides(OwnerOverrides::new(&state.config.owner_overrides))
        .with_max_age_hours(state.config.cache_max_age_hours);

    let lookup = service.lookup(address).await?;
    Ok(Json(lookup))
}
