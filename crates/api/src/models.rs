//! Response bundles returned by the API service. Each carries `last_updated`,
//! the time the payload was produced (not the time it was served from cache).

use chrono::{DateTime, Utc};
use insights_core::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub metrics: Vec<MetricData>,
    pub time_series_data: Vec<TimeSeriesData>,
    pub channel_performance: Vec<ChannelPerformance>,
    pub conversion_funnel: Vec<FunnelStage>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPage {
    pub campaigns: Vec<Campaign>,
    pub pagination: Pagination,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub time_series_data: Vec<TimeSeriesData>,
    pub geographic: Vec<ShareSlice>,
    pub device_performance: Vec<DevicePerformance>,
    pub age_groups: Vec<ShareSlice>,
    pub top_keywords: Vec<KeywordPerformance>,
    pub hourly_data: Vec<HourlyPoint>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    pub competitors: Vec<Competitor>,
    pub industry_benchmarks: IndustryBenchmarks,
    pub market_trends: Vec<TimeSeriesData>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbTestReport {
    pub tests: Vec<AbTestResult>,
    pub last_updated: DateTime<Utc>,
}
