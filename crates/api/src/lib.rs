//! In-process API facade over the mock data layer: cached endpoints with
//! simulated latency, campaign querying and the dashboard data loader.

pub mod dashboard;
pub mod models;
pub mod query;
pub mod service;
pub mod source;

pub use dashboard::{DashboardData, DerivedMetrics};
pub use models::{AbTestReport, AnalyticsData, CampaignPage, CompetitorAnalysis, DashboardOverview};
pub use query::{CampaignQuery, CampaignSortField, SortOrder};
pub use service::ApiService;
pub use source::{DataSource, MockDataSource};
