//! API service facade: simulated endpoints behind a TTL cache.
//!
//! Each cached endpoint derives a key from its name and parameters, returns a
//! fresh cache entry immediately, and otherwise waits the endpoint's simulated
//! latency, asks the [`DataSource`] for a new payload and caches it.

use crate::models::*;
use crate::query::CampaignQuery;
use crate::source::{DataSource, MockDataSource};
use chrono::{DateTime, Utc};
use insights_cache::{CacheKey, CacheStats, TtlCache};
use insights_core::config::ApiConfig;
use insights_core::types::{DateRange, RealTimeMetrics};
use insights_core::{Clock, InsightsError, InsightsResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const OVERVIEW_ENDPOINT: &str = "dashboard_overview";
pub const CAMPAIGNS_ENDPOINT: &str = "campaigns";
pub const ANALYTICS_ENDPOINT: &str = "analytics";
pub const COMPETITORS_ENDPOINT: &str = "competitor_analysis";
pub const AB_TESTS_ENDPOINT: &str = "ab_test_results";

/// Default days of history in the dashboard overview.
pub const OVERVIEW_DAYS: usize = 30;

/// Longest analytics window, in days (about ten years).
pub const MAX_ANALYTICS_DAYS: i64 = 3650;

pub struct ApiService<S: DataSource = MockDataSource> {
    source: S,
    cache: TtlCache,
    clock: Arc<dyn Clock>,
    config: ApiConfig,
    overview_days: usize,
}

impl<S: DataSource> ApiService<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>, config: ApiConfig) -> Self {
        info!(
            overview_ttl_min = config.overview_ttl_minutes,
            campaigns_ttl_min = config.campaigns_ttl_minutes,
            "API service initialized"
        );
        Self {
            source,
            cache: TtlCache::new(clock.clone()),
            clock,
            config,
            overview_days: OVERVIEW_DAYS,
        }
    }

    pub fn with_overview_days(mut self, days: usize) -> Self {
        self.overview_days = days;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn simulate_latency(latency_ms: u64) {
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }
    }

    async fn cached<T, F>(
        &self,
        key: CacheKey,
        latency_ms: u64,
        ttl_minutes: u64,
        produce: F,
    ) -> InsightsResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&S, DateTime<Utc>) -> InsightsResult<T>,
    {
        if let Some(hit) = self.cache.get_as::<T>(&key)? {
            return Ok(hit);
        }

        Self::simulate_latency(latency_ms).await;
        metrics::counter!("api.source_fetch").increment(1);

        let data = produce(&self.source, self.clock.now()).map_err(|e| {
            warn!(key = %key, error = %e, "Data source fetch failed");
            match e {
                InsightsError::Fetch(_) | InsightsError::Validation(_) => e,
                other => InsightsError::Fetch(other.to_string()),
            }
        })?;
        self.cache.set_value(&key, &data, ttl_minutes)?;
        debug!(key = %key, ttl_min = ttl_minutes, "Cached fresh payload");
        Ok(data)
    }

    /// Headline metrics, the overview time series and channel/funnel
    /// breakdowns. The range only scopes the cache entry.
    pub async fn dashboard_overview(
        &self,
        date_range: Option<DateRange>,
    ) -> InsightsResult<DashboardOverview> {
        let key = CacheKey::new(OVERVIEW_ENDPOINT, date_range.as_ref())?;
        let days = self.overview_days;
        self.cached(
            key,
            self.config.overview_latency_ms,
            self.config.overview_ttl_minutes,
            |source, now| source.overview(now, days),
        )
        .await
    }

    pub async fn campaigns(&self, query: CampaignQuery) -> InsightsResult<CampaignPage> {
        let key = CacheKey::new(CAMPAIGNS_ENDPOINT, Some(&query))?;
        self.cached(
            key,
            self.config.campaigns_latency_ms,
            self.config.campaigns_ttl_minutes,
            |source, now| {
                let (campaigns, pagination) = query.apply(source.campaigns()?);
                Ok(CampaignPage {
                    campaigns,
                    pagination,
                    last_updated: now,
                })
            },
        )
        .await
    }

    /// Analytics for a date window; the series has one point per day between
    /// `start` and `end`.
    pub async fn analytics(&self, date_range: DateRange) -> InsightsResult<AnalyticsData> {
        let days = date_range.days();
        if days < 0 {
            return Err(InsightsError::Validation(format!(
                "Date range end {} precedes start {}",
                date_range.end, date_range.start
            )));
        }
        if days > MAX_ANALYTICS_DAYS {
            return Err(InsightsError::Validation(format!(
                "Date range spans {days} days; the limit is {MAX_ANALYTICS_DAYS}"
            )));
        }
        let key = CacheKey::new(ANALYTICS_ENDPOINT, Some(&date_range))?;
        self.cached(
            key,
            self.config.analytics_latency_ms,
            self.config.analytics_ttl_minutes,
            |source, now| source.analytics(now, days as usize),
        )
        .await
    }

    pub async fn competitor_analysis(&self) -> InsightsResult<CompetitorAnalysis> {
        self.cached(
            CacheKey::bare(COMPETITORS_ENDPOINT),
            self.config.competitors_latency_ms,
            self.config.competitors_ttl_minutes,
            |source, now| source.competitor_analysis(now),
        )
        .await
    }

    pub async fn ab_test_results(&self) -> InsightsResult<AbTestReport> {
        self.cached(
            CacheKey::bare(AB_TESTS_ENDPOINT),
            self.config.ab_tests_latency_ms,
            self.config.ab_tests_ttl_minutes,
            |source, now| source.ab_test_results(now),
        )
        .await
    }

    /// Live snapshot. Never cached.
    pub async fn real_time_metrics(&self) -> InsightsResult<RealTimeMetrics> {
        Self::simulate_latency(self.config.realtime_latency_ms).await;
        self.source
            .real_time_metrics(self.clock.now())
            .map_err(|e| InsightsError::Fetch(e.to_string()))
    }

    /// Drop cached entries whose key contains `pattern`, or all of them.
    pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
        let removed = self.cache.invalidate(pattern);
        info!(pattern = ?pattern, removed = removed, "Cache cleared");
        removed
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
