use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use plat_core::Error;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub total_entries: i64,
    pub average_access_count: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<DateTime<Utc>>,
}

/// GET /api/cache/stats
#[instrument(skip(state), name = "api_cache_stats")]
pub async fn get_cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let stats = state.db.property_stats().await?;

    let response = match stats {
        Some(stats) => CacheStatsResponse {
            total_entries: stats.total_entries,
            average_access_count: stats.avg_access_count,
            oldest_entry: Some(stats.oldest_entry),
            newest_entry: Some(stats.newest_entry),
        },
        None => CacheStatsResponse {
            total_entries: 0,
            average_access_count: 0.0,
            oldest_entry: None,
            newest_entry: None,
        },
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepParams {
    pub older_than_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub deleted: u64,
}

/// POST /api/cache/sweep?olderThanDays=N
///
/// Deletes entries not updated within the retention window. Defaults to
/// the configured retention when the parameter is omitted.
#[instrument(skip(state), name = "api_cache_sweep")]
pub async fn sweep_cache(
    State(state): State<AppState>,
    Query(params): Query<SweepParams>,
) -> Result<Json<SweepResponse>, ApiError> {
    let older_than_days = params
        .older_than_days
        .unwrap_or(state.config.sweep_retention_days);
    if older_than_days < 1 {
        return Err(
            Error::InvalidInput("olderThanDays must be at least 1".to_string()).into(),
        );
    }

    let deleted = state.db.sweep_stale(older_than_days).await?;
    tracing::info!(deleted, older_than_days, "cache sweep completed");

    Ok(Json(SweepResponse { deleted }))
}
