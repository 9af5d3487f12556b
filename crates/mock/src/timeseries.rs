//! Synthetic daily and hourly traffic series.
//!
//! Each daily value is `base × weekly × growth × variation × seasonal`, with a
//! flat 0.7 dampening on Saturdays and Sundays. `variation` is the only random
//! input, so a seeded RNG reproduces a series exactly.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use insights_core::types::{HourlyPoint, TimeSeriesData};
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;

/// Multiplier applied to weekend days.
pub const WEEKEND_FACTOR: f64 = 0.7;

/// Baseline daily values before any multiplier is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesBaseline {
    pub revenue: f64,
    pub users: f64,
    pub conversions: f64,
    pub impressions: f64,
}

impl Default for SeriesBaseline {
    fn default() -> Self {
        Self {
            revenue: 3500.0,
            users: 1800.0,
            conversions: 120.0,
            impressions: 45000.0,
        }
    }
}

impl SeriesBaseline {
    /// Build the record for `date`, applying `multiplier` and weekend dampening.
    pub fn point(&self, date: NaiveDate, multiplier: f64) -> TimeSeriesData {
        let m = multiplier * weekend_factor(date);
        TimeSeriesData {
            date,
            revenue: scaled(self.revenue, m),
            users: scaled(self.users, m),
            conversions: scaled(self.conversions, m),
            impressions: scaled(self.impressions, m),
        }
    }
}

fn scaled(base: f64, multiplier: f64) -> u64 {
    (base * multiplier).round().max(0.0) as u64
}

pub fn weekend_factor(date: NaiveDate) -> f64 {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_FACTOR,
        _ => 1.0,
    }
}

/// Combined trend for day `i` of a `days`-long window, excluding the weekend
/// factor. `variation` is the random perturbation in `[0.85, 1.15)`.
pub fn trend_multiplier(i: usize, days: usize, variation: f64) -> f64 {
    let weekly = (((i % 7) as f64) * PI / 3.5).sin() * 0.15 + 1.0;
    let growth = 1.0 + (i as f64 / days.max(1) as f64) * 0.3;
    let seasonal = (i as f64 / 10.0).sin() * 0.1 + 1.0;
    weekly * growth * variation * seasonal
}

/// `days` consecutive daily records, the first one `days` days before `today`.
/// A window reaching past the earliest representable date starts there
/// instead, and stops at the latest one.
pub fn generate_time_series<R: Rng + ?Sized>(
    days: usize,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<TimeSeriesData> {
    let baseline = SeriesBaseline::default();
    let start = i64::try_from(days)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|span| today.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);

    let series: Vec<TimeSeriesData> = start
        .iter_days()
        .take(days)
        .enumerate()
        .map(|(i, date)| {
            let variation = 0.85 + rng.gen::<f64>() * 0.3;
            baseline.point(date, trend_multiplier(i, days, variation))
        })
        .collect();
    debug!(days, points = series.len(), start = %start, "Generated time series");
    series
}

fn hourly_traffic_band(hour: u32) -> f64 {
    match hour {
        0..=5 => 0.3,
        6..=8 => 0.6,
        9..=16 => 1.0,
        17..=21 => 0.8,
        _ => 0.4,
    }
}

/// Today's 24 hourly buckets.
pub fn generate_hourly_data<R: Rng + ?Sized>(rng: &mut R) -> Vec<HourlyPoint> {
    (0..24u32)
        .map(|hour| {
            let level = hourly_traffic_band(hour) * (0.8 + rng.gen::<f64>() * 0.4);
            HourlyPoint {
                hour: format!("{hour:02}:00"),
                traffic: (level * 100.0).round() as u64,
                conversions: (level * 8.0).round() as u64,
                revenue: (level * 450.0).round() as u64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    #[test]
    fn test_series_length_and_contiguous_dates() {
        let mut rng = StdRng::seed_from_u64(42);
        for days in [0usize, 1, 7, 30, 90] {
            let series = generate_time_series(days, today(), &mut rng);
            assert_eq!(series.len(), days);
            for pair in series.windows(2) {
                assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
            }
            if let Some(first) = series.first() {
                assert_eq!(first.date, today() - Duration::days(days as i64));
            }
        }
    }

    #[test]
    fn test_window_before_min_date_starts_at_min() {
        let mut rng = StdRng::seed_from_u64(5);
        let near_min = NaiveDate::MIN + Duration::days(3);
        let series = generate_time_series(10, near_min, &mut rng);
        assert_eq!(series.len(), 10);
        assert_eq!(series[0].date, NaiveDate::MIN);
        assert_eq!(series[9].date, NaiveDate::MIN + Duration::days(9));
    }

    #[test]
    fn test_seeded_series_is_reproducible() {
        let a = generate_time_series(30, today(), &mut StdRng::seed_from_u64(7));
        let b = generate_time_series(30, today(), &mut StdRng::seed_from_u64(7));
        let c = generate_time_series(30, today(), &mut StdRng::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_weekend_revenue_is_dampened() {
        let baseline = SeriesBaseline::default();
        let saturday = NaiveDate::from_ymd_opt(2024, 7, 13).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 7, 14).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();

        for variation in [0.85, 1.0, 1.149] {
            let m = trend_multiplier(3, 30, variation);
            let weekday = baseline.point(monday, m);
            assert!(baseline.point(saturday, m).revenue < weekday.revenue);
            assert!(baseline.point(sunday, m).revenue < weekday.revenue);
            assert_eq!(
                baseline.point(saturday, m).revenue,
                (3500.0 * m * WEEKEND_FACTOR).round() as u64
            );
        }
    }

    #[test]
    fn test_values_stay_within_trend_bounds() {
        let series = generate_time_series(60, today(), &mut StdRng::seed_from_u64(1));
        // weekly ≤ 1.15, growth < 1.3, variation < 1.15, seasonal ≤ 1.1
        let ceiling = 3500.0 * 1.15 * 1.3 * 1.15 * 1.1;
        let floor = 3500.0 * 0.85 * 0.85 * 0.9 * WEEKEND_FACTOR;
        for day in &series {
            assert!((day.revenue as f64) < ceiling);
            assert!((day.revenue as f64) > floor);
        }
    }

    #[test]
    fn test_hourly_data_has_24_labelled_buckets() {
        let hours = generate_hourly_data(&mut StdRng::seed_from_u64(3));
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[0].hour, "00:00");
        assert_eq!(hours[23].hour, "23:00");
        // Night buckets never exceed the working-hours ceiling.
        assert!(hours[2].traffic <= 36);
        assert!(hours[12].traffic >= 80);
    }
}
