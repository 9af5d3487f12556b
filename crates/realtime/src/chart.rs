use chrono::{DateTime, Utc};
use insights_core::types::ChartPoint;
use insights_mock::generate_chart_point;
use rand::Rng;
use std::collections::VecDeque;

/// Rolling window of live chart samples, oldest first.
#[derive(Debug, Clone)]
pub struct LiveChart {
    window: usize,
    points: VecDeque<ChartPoint>,
}

impl LiveChart {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            points: VecDeque::with_capacity(window),
        }
    }

    /// Replace the contents with `count` fresh samples stamped `now`.
    pub fn seed<R: Rng + ?Sized>(&mut self, count: usize, now: DateTime<Utc>, rng: &mut R) {
        self.points.clear();
        for _ in 0..count {
            self.push(generate_chart_point(now, rng));
        }
    }

    pub fn push(&mut self, point: ChartPoint) {
        self.points.push_back(point);
        while self.points.len() > self.window {
            self.points.pop_front();
        }
    }

    pub fn sample<R: Rng + ?Sized>(&mut self, now: DateTime<Utc>, rng: &mut R) {
        self.push(generate_chart_point(now, rng));
    }

    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_window_keeps_latest_points() {
        let mut rng = StdRng::seed_from_u64(4);
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();
        let mut chart = LiveChart::new(20);
        chart.seed(10, start, &mut rng);
        assert_eq!(chart.len(), 10);

        for i in 1..=25 {
            chart.sample(start + Duration::seconds(10 * i), &mut rng);
        }
        assert_eq!(chart.len(), 20);
        let last = chart.points().last().unwrap();
        assert_eq!(last.time, "08:04:10");
        // All seeded points plus the first five samples were dropped.
        let first = chart.points().next().unwrap();
        assert_eq!(first.time, "08:01:00");
    }
}
