use crate::analytics::types::AnalyticsData;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

const REPORT_KEY: &str = "report";

/// Short-lived cache of the admin analytics report.
/// A TTL of zero disables it: `get` always misses and `insert` is a no-op.
pub struct AnalyticsCache {
    inner: Option<Cache<&'static str, Arc<AnalyticsData>>>,
}

impl AnalyticsCache {
    pub fn new(ttl_secs: u64) -> Self {
        let inner = (ttl_secs > 0).then(|| {
            Cache::builder()
                .time_to_live(Duration::from_secs(ttl_secs))
                .max_capacity(1)
                .build()
        });
        Self { inner }
    }

    pub fn get(&self) -> Option<Arc<AnalyticsData>> {
        self.inner.as_ref()?.get(REPORT_KEY)
    }

    pub fn insert(&self, report: Arc<AnalyticsData>) {
        if let Some(cache) = &self.inner {
            cache.insert(REPORT_KEY, report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::{DeviceStats, LanguageStats, ThemeStats};
    use std::collections::BTreeMap;

    fn report(total: i64) -> Arc<AnalyticsData> {
        Arc::new(AnalyticsData {
            total_visits: total,
            unique_visitors: 0,
            today_visits: 0,
            week_visits: 0,
            avg_session_duration: 0.0,
            bounce_rate: 0.0,
            page_views: BTreeMap::new(),
            top_pages: Vec::new(),
            visits_by_day: Vec::new(),
            visits_by_hour: vec![0; 24],
            devices: DeviceStats::default(),
            themes: ThemeStats::default(),
            languages: LanguageStats::default(),
        })
    }

    #[test]
    fn test_cache_hit_after_insert() {
        let cache = AnalyticsCache::new(60);
        assert!(cache.get().is_none());
        cache.insert(report(7));
        assert_eq!(cache.get().map(|r| r.total_visits), Some(7));
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = AnalyticsCache::new(0);
        cache.insert(report(7));
        assert!(cache.get().is_none());
    }
}
