use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Creates all API routes with state
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/property", get(handlers::lookup_property))
        .route("/api/cache/stats", get(handlers::get_cache_stats))
        .route("/api/cache/sweep", post(handlers::sweep_cache))
        .with_state(state)
}
