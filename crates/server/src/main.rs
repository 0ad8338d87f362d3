//! plat server entry point.
//!
//! Boots the HTTP API: loads layered configuration, opens the cache
//! database (running migrations), and serves the axum router.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod routes;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = plat_core::AppConfig::load()?;
    let db = plat_core::CacheDb::open(&config.db_path).await?;

    tracing::info!("starting plat server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let app = routes::create_api_routes(state::AppState::new(db, config));

    axum::serve(listener, app).await?;

    Ok(())
}
