//! Fixed-interval deadline tracking stepped by explicit timestamps.
//!
//! A [`Ticker`] never reads the wall clock: callers hand it "now" and it
//! reports which deadlines have passed. Tests step it deterministically; the
//! binary steps it from a tokio interval.

use chrono::{DateTime, Duration, Utc};

/// Roughly 31 years.
pub const MAX_INTERVAL_MS: u64 = 1_000_000_000_000;

/// A configured millisecond count as a duration, capped at `MAX_INTERVAL_MS`.
pub fn millis(ms: u64) -> Duration {
    Duration::milliseconds(ms.min(MAX_INTERVAL_MS) as i64)
}

/// `at + span`, saturating at the latest representable instant.
pub fn deadline(at: DateTime<Utc>, span: Duration) -> DateTime<Utc> {
    at.checked_add_signed(span).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    interval: Duration,
    next_due: DateTime<Utc>,
}

impl Ticker {
    /// First firing is one interval after `start`. Intervals are clamped to
    /// `[1 ms, MAX_INTERVAL_MS]`.
    pub fn new(interval_ms: u64, start: DateTime<Utc>) -> Self {
        let interval = millis(interval_ms.max(1));
        Self {
            interval,
            next_due: deadline(start, interval),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_due
    }

    /// Consume the next deadline if it is at or before `now`. A ticker whose
    /// next deadline would pass the latest representable instant stops.
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.next_due > now {
            return None;
        }
        let fired = self.next_due;
        self.next_due = self.next_due.checked_add_signed(self.interval)?;
        Some(fired)
    }

    /// Consume every deadline up to `now`, returning how many passed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> u32 {
        let mut fired = 0;
        while self.fire_if_due(now).is_some() {
            fired += 1;
        }
        fired
    }
}
