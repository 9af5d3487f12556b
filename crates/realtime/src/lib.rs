//! Real-time simulators for the live dashboard views: the metrics poll,
//! activity feed, live campaign drift and rolling chart, all stepped by
//! explicit timestamps.

pub mod chart;
pub mod drift;
pub mod feed;
pub mod poller;
pub mod session;

pub use chart::LiveChart;
pub use drift::CampaignDrift;
pub use feed::ActivityFeed;
pub use insights_core::Ticker;
pub use poller::MetricsPoller;
pub use session::{run_until, LiveSession, MetricsSource, Simulator};
