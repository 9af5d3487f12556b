//! Shared data model, configuration, clock and error type for the
//! ADmyBRAND Insights data layer.

pub mod clock;
pub mod config;
pub mod error;
pub mod kpi;
pub mod schedule;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::{InsightsError, InsightsResult};
pub use schedule::{deadline, millis, Ticker};
