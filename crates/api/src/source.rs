//! Data sources behind the API service.
//!
//! The service owns caching, latency and querying; a [`DataSource`] only
//! produces fresh payloads. [`MockDataSource`] serves the demo fixtures and
//! generators. Tests plug in sources that fail on demand.

use crate::models::*;
use chrono::{DateTime, Utc};
use insights_core::types::{Campaign, RealTimeMetrics};
use insights_core::InsightsResult;
use insights_mock::{fixtures, generate_hourly_data, generate_real_time_metrics, generate_time_series};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Days of market data in the competitor analysis.
pub const MARKET_TREND_DAYS: usize = 90;

pub trait DataSource: Send + Sync {
    fn overview(&self, now: DateTime<Utc>, days: usize) -> InsightsResult<DashboardOverview>;

    /// The full, unfiltered campaign list.
    fn campaigns(&self) -> InsightsResult<Vec<Campaign>>;

    fn analytics(&self, now: DateTime<Utc>, days: usize) -> InsightsResult<AnalyticsData>;

    fn competitor_analysis(&self, now: DateTime<Utc>) -> InsightsResult<CompetitorAnalysis>;

    fn ab_test_results(&self, now: DateTime<Utc>) -> InsightsResult<AbTestReport>;

    fn real_time_metrics(&self, now: DateTime<Utc>) -> InsightsResult<RealTimeMetrics>;
}

/// Fixture-backed source with a shared PRNG for the generated series.
pub struct MockDataSource {
    rng: Mutex<StdRng>,
}

impl MockDataSource {
    /// `Some(seed)` gives reproducible series; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DataSource for MockDataSource {
    fn overview(&self, now: DateTime<Utc>, days: usize) -> InsightsResult<DashboardOverview> {
        let mut rng = self.rng.lock();
        Ok(DashboardOverview {
            metrics: fixtures::metrics(),
            time_series_data: generate_time_series(days, now.date_naive(), &mut *rng),
            channel_performance: fixtures::channel_performance(),
            conversion_funnel: fixtures::conversion_funnel(),
            last_updated: now,
        })
    }

    fn campaigns(&self) -> InsightsResult<Vec<Campaign>> {
        Ok(fixtures::campaigns())
    }

    fn analytics(&self, now: DateTime<Utc>, days: usize) -> InsightsResult<AnalyticsData> {
        let mut rng = self.rng.lock();
        Ok(AnalyticsData {
            time_series_data: generate_time_series(days, now.date_naive(), &mut *rng),
            geographic: fixtures::geographic(),
            device_performance: fixtures::device_performance(),
            age_groups: fixtures::age_groups(),
            top_keywords: fixtures::top_keywords(),
            hourly_data: generate_hourly_data(&mut *rng),
            last_updated: now,
        })
    }

    fn competitor_analysis(&self, now: DateTime<Utc>) -> InsightsResult<CompetitorAnalysis> {
        let mut rng = self.rng.lock();
        Ok(CompetitorAnalysis {
            competitors: fixtures::competitors(),
            industry_benchmarks: fixtures::industry_benchmarks(),
            market_trends: generate_time_series(MARKET_TREND_DAYS, now.date_naive(), &mut *rng),
            last_updated: now,
        })
    }

    fn ab_test_results(&self, now: DateTime<Utc>) -> InsightsResult<AbTestReport> {
        Ok(AbTestReport {
            tests: fixtures::ab_test_results(),
            last_updated: now,
        })
    }

    fn real_time_metrics(&self, now: DateTime<Utc>) -> InsightsResult<RealTimeMetrics> {
        Ok(generate_real_time_metrics(now, &mut *self.rng.lock()))
    }
}
