//! Dashboard data loader: the overview plus the top campaigns, with the
//! derived totals shown in the dashboard header.

use crate::query::{CampaignQuery, CampaignSortField, SortOrder};
use crate::service::{ApiService, CAMPAIGNS_ENDPOINT, OVERVIEW_ENDPOINT};
use crate::source::DataSource;
use chrono::{DateTime, Utc};
use insights_core::config::DashboardConfig;
use insights_core::types::{Campaign, Channel, DateRange, MetricData, TimeSeriesData};
use insights_core::{millis, InsightsResult, Ticker};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_budget: f64,
    pub total_spent: f64,
    pub avg_roas: f64,
    pub top_performing_channel: Option<Channel>,
}

impl DerivedMetrics {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let total = campaigns.len();
        let avg_roas = if total > 0 {
            campaigns.iter().map(|c| c.roas).sum::<f64>() / total as f64
        } else {
            0.0
        };
        // Later campaigns win ties.
        let top = campaigns
            .iter()
            .reduce(|best, c| if best.roas > c.roas { best } else { c })
            .map(|c| c.channel);

        Self {
            total_campaigns: total,
            active_campaigns: campaigns.iter().filter(|c| c.is_active()).count(),
            total_budget: campaigns.iter().map(|c| c.budget).sum(),
            total_spent: campaigns.iter().map(|c| c.spent).sum(),
            avg_roas,
            top_performing_channel: top,
        }
    }
}

pub struct DashboardData<S: DataSource> {
    api: Arc<ApiService<S>>,
    config: DashboardConfig,
    date_range: Option<DateRange>,
    auto_refresh: Option<Ticker>,

    pub campaigns: Vec<Campaign>,
    pub metrics: Vec<MetricData>,
    pub time_series: Vec<TimeSeriesData>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<S: DataSource> DashboardData<S> {
    pub fn new(api: Arc<ApiService<S>>, config: DashboardConfig) -> Self {
        let auto_refresh = config
            .auto_refresh
            .then(|| Ticker::new(config.refresh_interval_ms, api.clock().now()));
        Self {
            api,
            config,
            date_range: None,
            auto_refresh,
            campaigns: Vec::new(),
            metrics: Vec::new(),
            time_series: Vec::new(),
            loading: true,
            error: None,
            last_updated: None,
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    fn campaign_query(&self) -> CampaignQuery {
        CampaignQuery::default()
            .paged(1, self.config.campaign_limit)
            .sorted_by(CampaignSortField::Spent, SortOrder::Desc)
    }

    async fn load(&self) -> InsightsResult<(crate::models::DashboardOverview, Vec<Campaign>)> {
        let overview = self.api.dashboard_overview(self.date_range).await?;
        let page = self.api.campaigns(self.campaign_query()).await?;
        Ok((overview, page.campaigns))
    }

    /// Fetch the overview and the campaign list. A failure keeps whatever
    /// was loaded before and records the message in `error`.
    pub async fn fetch(&mut self, show_loading: bool) {
        if show_loading {
            self.loading = true;
            self.error = None;
        }

        match self.load().await {
            Ok((overview, campaigns)) => {
                debug!(
                    campaigns = campaigns.len(),
                    points = overview.time_series_data.len(),
                    "Dashboard data loaded"
                );
                self.campaigns = campaigns;
                self.metrics = overview.metrics;
                self.time_series = overview.time_series_data;
                self.last_updated = Some(overview.last_updated);
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, "Dashboard data fetch error");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Drop the cached overview and campaigns, then refetch quietly.
    pub async fn refresh(&mut self) {
        self.api.clear_cache(Some(OVERVIEW_ENDPOINT));
        self.api.clear_cache(Some(CAMPAIGNS_ENDPOINT));
        self.fetch(false).await;
    }

    /// Refresh once if the auto-refresh interval has passed. Missed
    /// intervals collapse into a single refresh.
    pub async fn poll_auto_refresh(&mut self, now: DateTime<Utc>) -> bool {
        let due = match self.auto_refresh.as_mut() {
            Some(ticker) => ticker.poll(now) > 0,
            None => false,
        };
        if due {
            info!("Auto-refreshing dashboard data");
            self.refresh().await;
        }
        due
    }

    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics::from_campaigns(&self.campaigns)
    }

    /// True once more than the refresh interval has passed since the data
    /// was produced. Never stale before the first successful load.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let interval = millis(self.config.refresh_interval_ms);
        self.last_updated
            .map(|at| now - at > interval)
            .unwrap_or(false)
    }
}
