pub mod cache;
pub mod handler;
pub mod recorder;
pub mod reporter;
pub mod types;
pub mod window;

use crate::config::AnalyticsConfig;
use cache::AnalyticsCache;
use deadpool_sqlite::Pool;

/// Shared state for analytics endpoints.
pub struct AnalyticsState {
    pub pool: Pool,
    pub cache: AnalyticsCache,
    pub config: AnalyticsConfig,
}

impl AnalyticsState {
    pub fn new(pool: Pool, config: AnalyticsConfig) -> Self {
        let cache = AnalyticsCache::new(config.cache_ttl_secs);
        Self {
            pool,
            cache,
            config,
        }
    }
}
