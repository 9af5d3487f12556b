//! Live session: the metrics poll, activity feed, campaign drift and live
//! chart stepped from one place.
//!
//! Every simulator has its own [`Ticker`]. [`LiveSession::advance`] replays
//! all deadlines up to "now" in chronological order, so a test can jump the
//! clock by minutes and observe exactly the ticks a wall-clock run would have
//! produced. Stopping the session drops the tickers; nothing fires until the
//! next start.

use crate::chart::LiveChart;
use crate::drift::CampaignDrift;
use crate::feed::ActivityFeed;
use crate::poller::MetricsPoller;
use chrono::{DateTime, Utc};
use insights_core::config::RealTimeConfig;
use insights_core::types::{Campaign, RealTimeMetrics};
use insights_core::{Clock, InsightsResult, Ticker};
use insights_mock::{generate_activity, generate_real_time_metrics};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Produces a metrics snapshot for a poll.
pub type MetricsSource =
    Box<dyn FnMut(DateTime<Utc>, &mut StdRng) -> InsightsResult<RealTimeMetrics> + Send>;

/// Simulators in the order they fire when deadlines coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Simulator {
    Metrics,
    Activities,
    Drift,
    Chart,
}

impl Simulator {
    pub const ALL: [Simulator; 4] = [
        Simulator::Metrics,
        Simulator::Activities,
        Simulator::Drift,
        Simulator::Chart,
    ];
}

#[derive(Debug, Clone)]
struct Tickers {
    metrics: Ticker,
    activities: Ticker,
    drift: Ticker,
    chart: Ticker,
}

impl Tickers {
    fn new(config: &RealTimeConfig, now: DateTime<Utc>) -> Self {
        Self {
            metrics: Ticker::new(config.metrics_interval_ms, now),
            activities: Ticker::new(config.activities_interval_ms, now),
            drift: Ticker::new(config.campaign_drift_interval_ms, now),
            chart: Ticker::new(config.chart_interval_ms, now),
        }
    }

    fn get_mut(&mut self, sim: Simulator) -> &mut Ticker {
        match sim {
            Simulator::Metrics => &mut self.metrics,
            Simulator::Activities => &mut self.activities,
            Simulator::Drift => &mut self.drift,
            Simulator::Chart => &mut self.chart,
        }
    }

    /// Earliest deadline at or before `now`, ties broken by simulator order.
    fn next_due(&mut self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, Simulator)> {
        Simulator::ALL
            .into_iter()
            .map(|sim| (self.get_mut(sim).next_due(), sim))
            .filter(|(due, _)| *due <= now)
            .min()
    }
}

pub struct LiveSession {
    config: RealTimeConfig,
    rng: StdRng,
    source: MetricsSource,
    tickers: Option<Tickers>,
    connected: bool,
    last_update: Option<DateTime<Utc>>,

    pub metrics: MetricsPoller,
    pub activities: ActivityFeed,
    pub drift: CampaignDrift,
    pub chart: LiveChart,
}

impl LiveSession {
    /// A stopped session. `config.seed` fixes the PRNG; unset seeds from
    /// entropy.
    pub fn new(config: RealTimeConfig, campaigns: Vec<Campaign>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            source: Box::new(|now: DateTime<Utc>, rng: &mut StdRng| {
                Ok(generate_real_time_metrics(now, rng))
            }),
            tickers: None,
            connected: false,
            last_update: None,
            metrics: MetricsPoller::new(),
            activities: ActivityFeed::new(config.max_activities),
            drift: CampaignDrift::new(campaigns, config.highlight_ms),
            chart: LiveChart::new(config.chart_window),
            config,
        }
    }

    pub fn with_metrics_source(mut self, source: MetricsSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_running(&self) -> bool {
        self.tickers.is_some()
    }

    /// False after a failed metrics poll until the next successful one.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Initial metrics poll and activity, a fresh chart, and tickers
    /// anchored at `now`. Starting a running session does nothing.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.is_running() {
            return;
        }
        self.tickers = Some(Tickers::new(&self.config, now));
        self.connected = true;
        self.chart.seed(self.config.chart_initial_points, now, &mut self.rng);
        self.fire(Simulator::Metrics, now);
        self.fire(Simulator::Activities, now);
        info!(
            metrics_ms = self.config.metrics_interval_ms,
            activities_ms = self.config.activities_interval_ms,
            "Real-time updates started"
        );
    }

    pub fn stop(&mut self) {
        if self.tickers.take().is_some() {
            info!("Real-time updates stopped");
        }
        self.connected = false;
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    pub fn clear_activities(&mut self) {
        self.activities.clear();
    }

    /// Fire every deadline up to `now`. Returns the number of ticks applied.
    pub fn advance(&mut self, now: DateTime<Utc>) -> usize {
        let mut fired = 0;
        loop {
            let Some(tickers) = self.tickers.as_mut() else {
                break;
            };
            let Some((due, sim)) = tickers.next_due(now) else {
                break;
            };
            tickers.get_mut(sim).fire_if_due(now);
            self.fire(sim, due);
            fired += 1;
        }
        self.drift.expire_highlight(now);
        fired
    }

    fn fire(&mut self, sim: Simulator, at: DateTime<Utc>) {
        match sim {
            Simulator::Metrics => {
                let result = (self.source)(at, &mut self.rng);
                self.connected = self.metrics.apply(result);
                self.last_update = Some(at);
            }
            Simulator::Activities => {
                self.activities.push(generate_activity(at, &mut self.rng));
                self.last_update = Some(at);
            }
            Simulator::Drift => {
                self.drift.step(at, &mut self.rng);
            }
            Simulator::Chart => {
                self.chart.sample(at, &mut self.rng);
            }
        }
        debug!(simulator = ?sim, at = %at, "Simulator tick");
    }
}

/// Drive `session` from a tokio interval until `shutdown` resolves.
/// Returns the total number of ticks applied.
pub async fn run_until<F>(
    session: &mut LiveSession,
    clock: Arc<dyn Clock>,
    period: std::time::Duration,
    shutdown: F,
) -> usize
where
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut fired = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                fired += session.advance(clock.now());
            }
        }
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use insights_core::{InsightsError, ManualClock};
    use insights_mock::fixtures;

    fn config() -> RealTimeConfig {
        RealTimeConfig {
            seed: Some(99),
            ..RealTimeConfig::default()
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_start_performs_initial_fetch() {
        let mut session = LiveSession::new(config(), fixtures::campaigns());
        assert!(!session.is_running());

        session.start(t0());
        assert!(session.is_running());
        assert!(session.is_connected());
        assert!(session.metrics.latest().is_some());
        assert_eq!(session.activities.len(), 1);
        assert_eq!(session.chart.len(), 10);
        assert_eq!(session.last_update(), Some(t0()));
    }

    #[test]
    fn test_advance_fires_each_simulator_on_its_interval() {
        let mut session = LiveSession::new(config(), fixtures::campaigns());
        session.start(t0());

        // 30 s: metrics x6, activities x15, drift x2, chart x3.
        let fired = session.advance(t0() + Duration::seconds(30));
        assert_eq!(fired, 26);
        assert_eq!(session.activities.len(), 16);
        assert_eq!(session.chart.len(), 13);
        assert_eq!(
            session.metrics.latest().map(|m| m.timestamp),
            Some(t0() + Duration::seconds(30))
        );
        // Activities are stamped at their own deadlines, newest first.
        let latest = session.activities.latest().unwrap();
        assert_eq!(latest.timestamp, t0() + Duration::seconds(30));
    }

    #[test]
    fn test_activity_feed_respects_max() {
        let mut session = LiveSession::new(config(), Vec::new());
        session.start(t0());
        session.advance(t0() + Duration::minutes(5));
        assert_eq!(session.activities.len(), 50);

        session.clear_activities();
        assert!(session.activities.is_empty());
    }

    #[test]
    fn test_highlight_expires_between_drift_ticks() {
        let mut session = LiveSession::new(config(), fixtures::campaigns());
        session.start(t0());

        session.advance(t0() + Duration::seconds(15));
        assert!(!session.drift.recent_updates().is_empty());

        session.advance(t0() + Duration::seconds(20));
        assert!(session.drift.recent_updates().is_empty());
    }

    #[test]
    fn test_stop_tears_down_tickers() {
        let mut session = LiveSession::new(config(), fixtures::campaigns());
        session.start(t0());
        session.toggle(t0() + Duration::seconds(1));
        assert!(!session.is_running());
        assert!(!session.is_connected());
        assert_eq!(session.advance(t0() + Duration::minutes(10)), 0);

        // Restarting anchors the tickers at the restart time.
        let restart = t0() + Duration::minutes(10);
        session.toggle(restart);
        assert_eq!(session.advance(restart + Duration::seconds(1)), 0);
        assert_eq!(session.advance(restart + Duration::seconds(2)), 1);
    }

    #[test]
    fn test_failed_poll_marks_disconnected() {
        let mut calls = 0;
        let source: MetricsSource = Box::new(move |now: DateTime<Utc>, rng: &mut StdRng| {
            calls += 1;
            if calls == 2 {
                return Err(InsightsError::Fetch("Failed to fetch real-time metrics".into()));
            }
            Ok(generate_real_time_metrics(now, rng))
        });
        let mut session =
            LiveSession::new(config(), Vec::new()).with_metrics_source(source);
        session.start(t0());
        assert!(session.is_connected());

        session.advance(t0() + Duration::seconds(5));
        assert!(!session.is_connected());
        assert!(session.is_running());
        assert_eq!(
            session.metrics.error(),
            Some("Failed to fetch real-time metrics")
        );

        session.advance(t0() + Duration::seconds(10));
        assert!(session.is_connected());
        assert!(session.metrics.error().is_none());
    }

    #[test]
    fn test_same_seed_same_session() {
        let run = || {
            let mut session = LiveSession::new(config(), fixtures::campaigns());
            session.start(t0());
            session.advance(t0() + Duration::minutes(1));
            (
                session.metrics.latest().cloned(),
                session.activities.iter().cloned().collect::<Vec<_>>(),
                session.drift.campaigns().to_vec(),
            )
        };
        assert_eq!(run(), run());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_drives_advance() {
        let clock = Arc::new(ManualClock::new(t0()));
        let mut session = LiveSession::new(config(), fixtures::campaigns());
        session.start(clock.now());
        clock.advance_millis(10_000);

        let fired = run_until(
            &mut session,
            clock.clone(),
            std::time::Duration::from_millis(250),
            tokio::time::sleep(std::time::Duration::from_secs(1)),
        )
        .await;
        // metrics x2, activities x5, chart x1
        assert_eq!(fired, 8);
    }
}
