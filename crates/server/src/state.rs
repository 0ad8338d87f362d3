use plat_core::{AppConfig, CacheDb};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: CacheDb,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: CacheDb, config: AppConfig) -> Self {
        Self { db, config }
    }
}
