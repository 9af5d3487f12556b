use chrono::{DateTime, Utc};
use insights_core::types::RealTimeMetrics;
use insights_core::InsightsResult;
use tracing::warn;

/// Latest real-time snapshot. Each poll replaces it outright; a failed poll
/// keeps the old snapshot and records the message.
#[derive(Debug, Clone, Default)]
pub struct MetricsPoller {
    latest: Option<RealTimeMetrics>,
    error: Option<String>,
    last_success: Option<DateTime<Utc>>,
}

impl MetricsPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a poll result. Returns whether it succeeded.
    pub fn apply(&mut self, result: InsightsResult<RealTimeMetrics>) -> bool {
        match result {
            Ok(snapshot) => {
                self.last_success = Some(snapshot.timestamp);
                self.latest = Some(snapshot);
                self.error = None;
                true
            }
            Err(e) => {
                warn!(error = %e, "Real-time metrics fetch failed");
                metrics::counter!("realtime.metrics_errors").increment(1);
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn latest(&self) -> Option<&RealTimeMetrics> {
        self.latest.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insights_core::InsightsError;
    use insights_mock::generate_real_time_metrics;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let mut poller = MetricsPoller::new();

        assert!(poller.apply(Ok(generate_real_time_metrics(now, &mut rng))));
        let snapshot = poller.latest().cloned();

        assert!(!poller.apply(Err(InsightsError::Fetch("timeout".into()))));
        assert_eq!(poller.error(), Some("timeout"));
        assert_eq!(poller.latest().cloned(), snapshot);
        assert_eq!(poller.last_success(), Some(now));
    }
}
