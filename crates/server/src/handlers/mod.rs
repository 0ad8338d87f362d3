pub mod cache;
pub mod health;
pub mod property;

pub use cache::{get_cache_stats, sweep_cache};
pub use health::health_check;
pub use property::lookup_property;
