use crate::kpi;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Advertising channel a campaign runs on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    #[serde(rename = "Social Media")]
    SocialMedia,
    Display,
    Email,
    Search,
    Video,
    Influencer,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::SocialMedia,
        Channel::Display,
        Channel::Email,
        Channel::Search,
        Channel::Video,
        Channel::Influencer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::SocialMedia => "Social Media",
            Channel::Display => "Display",
            Channel::Email => "Email",
            Channel::Search => "Search",
            Channel::Video => "Video",
            Channel::Influencer => "Influencer",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown channel: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
    Draft,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 4] = [
        CampaignStatus::Active,
        CampaignStatus::Paused,
        CampaignStatus::Completed,
        CampaignStatus::Draft,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "Active",
            CampaignStatus::Paused => "Paused",
            CampaignStatus::Completed => "Completed",
            CampaignStatus::Draft => "Draft",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignStatus::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown campaign status: {s}"))
    }
}

/// A marketing campaign with raw counters and the rates derived from them.
///
/// `ctr`, `cpc` and `roas` are caches of the counters, not independent facts;
/// call [`Campaign::recompute_derived`] after mutating the counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub channel: Channel,
    pub status: CampaignStatus,
    pub budget: f64,
    pub spent: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub ctr: f64,
    pub cpc: f64,
    pub roas: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_audience: String,
    pub objective: String,
}

impl Campaign {
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }

    pub fn remaining_budget(&self) -> f64 {
        (self.budget - self.spent).max(0.0)
    }

    pub fn recompute_derived(&mut self) {
        self.ctr = kpi::ctr(self.clicks, self.impressions);
        self.cpc = kpi::cpc(self.spent, self.clicks);
        self.roas = kpi::roas(self.conversions, self.spent);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Positive,
    Negative,
    Neutral,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Positive => "positive",
            ChangeType::Negative => "negative",
            ChangeType::Neutral => "neutral",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline value of a metric card: either already formatted or a bare number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            MetricValue::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricData {
    pub title: String,
    pub value: MetricValue,
    pub change: String,
    pub change_type: ChangeType,
    pub icon: String,
    pub description: String,
    pub trend: Vec<f64>,
}

/// One day of aggregated dashboard traffic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSeriesData {
    pub date: NaiveDate,
    pub revenue: u64,
    pub users: u64,
    pub conversions: u64,
    pub impressions: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Conversion,
    Signup,
    Purchase,
    Pageview,
    Click,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::Conversion,
        ActivityKind::Signup,
        ActivityKind::Purchase,
        ActivityKind::Pageview,
        ActivityKind::Click,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealTimeActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub value: Option<u64>,
    pub location: Option<String>,
    pub channel: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A live snapshot; every poll is an independent draw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeMetrics {
    pub active_users: u64,
    pub current_revenue: u64,
    pub conversion_rate: f64,
    pub bounce_rate: f64,
    pub avg_session_duration: String,
    pub page_views: u64,
    pub new_sessions: u64,
    pub goal_completions: u64,
    pub timestamp: DateTime<Utc>,
}

/// Sample on the live traffic chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub time: String,
    pub timestamp: i64,
    pub revenue: u64,
    pub users: u64,
    pub conversions: u64,
    pub bounce_rate: u64,
}

// ─── Analytics breakdowns ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPerformance {
    pub name: String,
    pub value: u64,
    pub campaigns: u32,
    #[serde(rename = "avgCTR")]
    pub avg_ctr: f64,
    #[serde(rename = "avgCPC")]
    pub avg_cpc: f64,
    pub total_spent: f64,
    pub conversions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub name: String,
    pub value: u64,
    pub stage: String,
    pub conversion_rate: f64,
}

/// Share of a whole, used for geographic and age-group breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareSlice {
    pub name: String,
    pub value: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DevicePerformance {
    pub name: String,
    pub value: f64,
    pub sessions: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    pub avg_session_duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordPerformance {
    pub keyword: String,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub avg_position: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub market_share: f64,
    #[serde(rename = "avgCPC")]
    pub avg_cpc: f64,
    pub estimated_budget: f64,
    pub top_keywords: Vec<String>,
    pub ad_strength: String,
}

/// Per-channel industry averages keyed by channel display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmarks {
    #[serde(rename = "avgCTR")]
    pub avg_ctr: std::collections::BTreeMap<String, f64>,
    #[serde(rename = "avgCPC")]
    pub avg_cpc: std::collections::BTreeMap<String, f64>,
    pub avg_conversion_rate: std::collections::BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourlyPoint {
    pub hour: String,
    pub traffic: u64,
    pub conversions: u64,
    pub revenue: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbTestResult {
    pub test_name: String,
    pub variant: String,
    pub visitors: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    pub confidence: u32,
    pub status: String,
}

// ─── Query plumbing ─────────────────────────────────────────────────────────

/// Inclusive-start date window used by the analytics endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whole days between `start` and `end`; negative when reversed.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign() -> Campaign {
        Campaign {
            id: "camp_001".into(),
            name: "Summer Sale".into(),
            channel: Channel::SocialMedia,
            status: CampaignStatus::Active,
            budget: 8500.0,
            spent: 6240.0,
            impressions: 245_000,
            clicks: 4680,
            conversions: 312,
            ctr: 0.0,
            cpc: 0.0,
            roas: 0.0,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
            target_audience: "Ages 25-45".into(),
            objective: "Drive Sales".into(),
        }
    }

    #[test]
    fn test_recompute_derived() {
        let mut c = campaign();
        c.recompute_derived();
        assert_eq!(c.ctr, 1.91);
        assert_eq!(c.cpc, 1.33);
        assert_eq!(c.roas, 5.0);
    }

    #[test]
    fn test_channel_serializes_as_label() {
        let json = serde_json::to_string(&Channel::SocialMedia).unwrap();
        assert_eq!(json, "\"Social Media\"");
        assert_eq!("social media".parse::<Channel>().unwrap(), Channel::SocialMedia);
        assert!("radio".parse::<Channel>().is_err());
    }

    #[test]
    fn test_campaign_json_is_camel_case() {
        let json = serde_json::to_value(campaign()).unwrap();
        assert!(json.get("targetAudience").is_some());
        assert_eq!(json["startDate"], "2024-06-01");
        assert_eq!(json["status"], "Active");
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Text("$127,845.32".into()).to_string(), "$127,845.32");
        assert_eq!(MetricValue::Number(8247.0).to_string(), "8247");
        assert_eq!(MetricValue::Number(4.8).to_string(), "4.8");
    }

    #[test]
    fn test_pagination_rounds_up() {
        let p = Pagination::new(1, 3, 8);
        assert_eq!(p.total_pages, 3);
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
    }

    #[test]
    fn test_activity_kind_field_is_named_type() {
        let activity = RealTimeActivity {
            id: "activity_1".into(),
            kind: ActivityKind::Signup,
            description: "created new account".into(),
            value: None,
            location: Some("London, UK".into()),
            channel: Some("Email".into()),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "signup");
    }
}
