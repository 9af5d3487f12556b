use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `INSIGHTS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub realtime: RealTimeConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Simulated endpoint latency and cache lifetimes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_overview_latency_ms")]
    pub overview_latency_ms: u64,
    #[serde(default = "default_campaigns_latency_ms")]
    pub campaigns_latency_ms: u64,
    #[serde(default = "default_analytics_latency_ms")]
    pub analytics_latency_ms: u64,
    #[serde(default = "default_competitors_latency_ms")]
    pub competitors_latency_ms: u64,
    #[serde(default = "default_ab_tests_latency_ms")]
    pub ab_tests_latency_ms: u64,
    #[serde(default = "default_realtime_latency_ms")]
    pub realtime_latency_ms: u64,
    #[serde(default = "default_overview_ttl_minutes")]
    pub overview_ttl_minutes: u64,
    #[serde(default = "default_campaigns_ttl_minutes")]
    pub campaigns_ttl_minutes: u64,
    #[serde(default = "default_analytics_ttl_minutes")]
    pub analytics_ttl_minutes: u64,
    #[serde(default = "default_competitors_ttl_minutes")]
    pub competitors_ttl_minutes: u64,
    #[serde(default = "default_ab_tests_ttl_minutes")]
    pub ab_tests_ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub auto_refresh: bool,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_campaign_limit")]
    pub campaign_limit: usize,
    #[serde(default = "default_overview_days")]
    pub overview_days: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RealTimeConfig {
    #[serde(default = "default_metrics_interval_ms")]
    pub metrics_interval_ms: u64,
    #[serde(default = "default_activities_interval_ms")]
    pub activities_interval_ms: u64,
    #[serde(default = "default_max_activities")]
    pub max_activities: usize,
    #[serde(default = "default_campaign_drift_interval_ms")]
    pub campaign_drift_interval_ms: u64,
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
    #[serde(default = "default_chart_interval_ms")]
    pub chart_interval_ms: u64,
    #[serde(default = "default_chart_window")]
    pub chart_window: usize,
    #[serde(default = "default_chart_initial_points")]
    pub chart_initial_points: usize,
    /// Fixed PRNG seed. Unset means entropy-seeded, non-reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
    #[serde(default = "default_complete_reset_ms")]
    pub complete_reset_ms: u64,
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_date_range_label")]
    pub default_date_range: String,
}

// Default functions
fn default_overview_latency_ms() -> u64 {
    600
}
fn default_campaigns_latency_ms() -> u64 {
    400
}
fn default_analytics_latency_ms() -> u64 {
    800
}
fn default_competitors_latency_ms() -> u64 {
    1000
}
fn default_ab_tests_latency_ms() -> u64 {
    500
}
fn default_realtime_latency_ms() -> u64 {
    200
}
fn default_overview_ttl_minutes() -> u64 {
    5
}
fn default_campaigns_ttl_minutes() -> u64 {
    3
}
fn default_analytics_ttl_minutes() -> u64 {
    10
}
fn default_competitors_ttl_minutes() -> u64 {
    30
}
fn default_ab_tests_ttl_minutes() -> u64 {
    15
}
fn default_refresh_interval_ms() -> u64 {
    300_000
}
fn default_campaign_limit() -> usize {
    20
}
fn default_overview_days() -> usize {
    30
}
fn default_metrics_interval_ms() -> u64 {
    5000
}
fn default_activities_interval_ms() -> u64 {
    2000
}
fn default_max_activities() -> usize {
    50
}
fn default_campaign_drift_interval_ms() -> u64 {
    15_000
}
fn default_highlight_ms() -> u64 {
    5000
}
fn default_chart_interval_ms() -> u64 {
    10_000
}
fn default_chart_window() -> usize {
    20
}
fn default_chart_initial_points() -> usize {
    10
}
fn default_processing_delay_ms() -> u64 {
    1500
}
fn default_complete_reset_ms() -> u64 {
    2000
}
fn default_brand() -> String {
    "ADmyBRAND".to_string()
}
fn default_date_range_label() -> String {
    "Last 30 days".to_string()
}

impl ApiConfig {
    /// Same TTLs, no simulated latency. Used by tests and batch tooling.
    pub fn without_latency() -> Self {
        Self {
            overview_latency_ms: 0,
            campaigns_latency_ms: 0,
            analytics_latency_ms: 0,
            competitors_latency_ms: 0,
            ab_tests_latency_ms: 0,
            realtime_latency_ms: 0,
            ..Self::default()
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            overview_latency_ms: default_overview_latency_ms(),
            campaigns_latency_ms: default_campaigns_latency_ms(),
            analytics_latency_ms: default_analytics_latency_ms(),
            competitors_latency_ms: default_competitors_latency_ms(),
            ab_tests_latency_ms: default_ab_tests_latency_ms(),
            realtime_latency_ms: default_realtime_latency_ms(),
            overview_ttl_minutes: default_overview_ttl_minutes(),
            campaigns_ttl_minutes: default_campaigns_ttl_minutes(),
            analytics_ttl_minutes: default_analytics_ttl_minutes(),
            competitors_ttl_minutes: default_competitors_ttl_minutes(),
            ab_tests_ttl_minutes: default_ab_tests_ttl_minutes(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            auto_refresh: false,
            refresh_interval_ms: default_refresh_interval_ms(),
            campaign_limit: default_campaign_limit(),
            overview_days: default_overview_days(),
        }
    }
}

impl Default for RealTimeConfig {
    fn default() -> Self {
        Self {
            metrics_interval_ms: default_metrics_interval_ms(),
            activities_interval_ms: default_activities_interval_ms(),
            max_activities: default_max_activities(),
            campaign_drift_interval_ms: default_campaign_drift_interval_ms(),
            highlight_ms: default_highlight_ms(),
            chart_interval_ms: default_chart_interval_ms(),
            chart_window: default_chart_window(),
            chart_initial_points: default_chart_initial_points(),
            seed: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
            complete_reset_ms: default_complete_reset_ms(),
            brand: default_brand(),
            default_date_range: default_date_range_label(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("INSIGHTS")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        tracing::debug!(
            seed = ?config.realtime.seed,
            brand = %config.export.brand,
            "Configuration read from environment"
        );
        Ok(config)
    }
}
