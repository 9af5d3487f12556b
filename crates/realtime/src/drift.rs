//! Live campaign drift: small random increments on every Active campaign.

use chrono::{DateTime, Duration, Utc};
use insights_core::types::Campaign;
use insights_core::{deadline, millis};
use rand::Rng;
use tracing::debug;

pub struct CampaignDrift {
    campaigns: Vec<Campaign>,
    highlight: Duration,
    recent: Vec<String>,
    highlight_until: Option<DateTime<Utc>>,
}

impl CampaignDrift {
    pub fn new(campaigns: Vec<Campaign>, highlight_ms: u64) -> Self {
        Self {
            campaigns,
            highlight: millis(highlight_ms),
            recent: Vec::new(),
            highlight_until: None,
        }
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn set_campaigns(&mut self, campaigns: Vec<Campaign>) {
        self.campaigns = campaigns;
    }

    /// Names flagged by the most recent step that changed anything.
    pub fn recent_updates(&self) -> &[String] {
        &self.recent
    }

    pub fn is_highlighted(&self, name: &str) -> bool {
        self.recent.iter().any(|n| n == name)
    }

    /// Clear the highlight once its deadline has been reached.
    pub fn expire_highlight(&mut self, now: DateTime<Utc>) {
        if self.highlight_until.is_some_and(|until| now >= until) {
            self.recent.clear();
            self.highlight_until = None;
        }
    }

    /// Apply one tick. Spend is capped at budget; campaigns whose spend moved
    /// replace the highlight set, which lasts until `now + highlight`.
    pub fn step<R: Rng + ?Sized>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Vec<String> {
        self.expire_highlight(now);

        let mut updated = Vec::new();
        for campaign in self.campaigns.iter_mut().filter(|c| c.is_active()) {
            let spend = f64::from(rng.gen_range(10..60u32));
            let impressions = rng.gen_range(100..1100u64);
            let clicks = rng.gen_range(2..22u64);
            let conversions = rng.gen_range(0..3u64);

            let previous = campaign.spent;
            campaign.spent = (campaign.spent + spend).min(campaign.budget);
            campaign.impressions += impressions;
            campaign.clicks += clicks;
            campaign.conversions += conversions;
            campaign.recompute_derived();

            if campaign.spent != previous {
                updated.push(campaign.name.clone());
            }
        }

        if !updated.is_empty() {
            debug!(updated = updated.len(), "Campaign drift applied");
            self.recent = updated.clone();
            self.highlight_until = Some(deadline(now, self.highlight));
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insights_core::kpi;
    use insights_core::types::CampaignStatus;
    use insights_mock::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_spent_never_exceeds_budget() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut drift = CampaignDrift::new(fixtures::campaigns(), 5000);
        for i in 0..2_000 {
            drift.step(start() + Duration::seconds(15 * i), &mut rng);
            for c in drift.campaigns() {
                assert!(c.spent <= c.budget, "{} overspent", c.name);
            }
        }
        // Every active campaign ends up exhausted and stops being flagged.
        assert!(drift
            .campaigns()
            .iter()
            .filter(|c| c.is_active())
            .all(|c| c.spent == c.budget));
        let later = start() + Duration::seconds(15 * 2_001);
        assert!(drift.step(later, &mut rng).is_empty());
    }

    #[test]
    fn test_only_active_campaigns_drift() {
        let mut rng = StdRng::seed_from_u64(8);
        let before = fixtures::campaigns();
        let mut drift = CampaignDrift::new(before.clone(), 5000);
        drift.step(start(), &mut rng);

        for (old, new) in before.iter().zip(drift.campaigns()) {
            if old.status == CampaignStatus::Active {
                assert!(new.impressions >= old.impressions + 100);
                assert!(new.clicks >= old.clicks + 2);
                assert!(new.conversions <= old.conversions + 2);
                assert_eq!(new.ctr, kpi::ctr(new.clicks, new.impressions));
                assert_eq!(new.cpc, kpi::cpc(new.spent, new.clicks));
                assert_eq!(new.roas, kpi::roas(new.conversions, new.spent));
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_highlight_clears_at_deadline() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut drift = CampaignDrift::new(fixtures::campaigns(), 5000);
        let names = drift.step(start(), &mut rng);
        assert!(!names.is_empty());
        assert!(drift.is_highlighted(&names[0]));

        drift.expire_highlight(start() + Duration::milliseconds(4999));
        assert_eq!(drift.recent_updates(), names.as_slice());

        drift.expire_highlight(start() + Duration::milliseconds(5000));
        assert!(drift.recent_updates().is_empty());
    }

    #[test]
    fn test_oversized_highlight_saturates() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut drift = CampaignDrift::new(fixtures::campaigns(), u64::MAX);
        let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        let names = drift.step(late, &mut rng);
        assert!(!names.is_empty());

        drift.expire_highlight(DateTime::<Utc>::MAX_UTC - Duration::milliseconds(1));
        assert_eq!(drift.recent_updates(), names.as_slice());
        drift.expire_highlight(DateTime::<Utc>::MAX_UTC);
        assert!(drift.recent_updates().is_empty());
    }
}
