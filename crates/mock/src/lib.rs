//! Mock campaign data: static fixtures plus randomized generators for
//! time series, hourly traffic, live metrics, activity events and chart
//! samples. Generators take the RNG as a parameter; seed it for reproducible
//! output.

pub mod fixtures;
pub mod live;
pub mod timeseries;

pub use live::{generate_activity, generate_chart_point, generate_real_time_metrics};
pub use timeseries::{generate_hourly_data, generate_time_series};
