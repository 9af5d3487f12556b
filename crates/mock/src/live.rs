//! Generators for the live views: metric snapshots, activity events and chart
//! samples. Every call is an independent draw from the supplied RNG.

use chrono::{DateTime, Utc};
use insights_core::kpi::round_to;
use insights_core::types::{ActivityKind, ChartPoint, RealTimeActivity, RealTimeMetrics};
use rand::seq::SliceRandom;
use rand::Rng;

pub fn generate_real_time_metrics<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    rng: &mut R,
) -> RealTimeMetrics {
    RealTimeMetrics {
        active_users: rng.gen_range(100..600),
        current_revenue: rng.gen_range(1000..6000),
        conversion_rate: round_to(rng.gen::<f64>() * 2.0 + 3.0, 1),
        bounce_rate: round_to(rng.gen::<f64>() * 20.0 + 30.0, 1),
        avg_session_duration: format!(
            "{}:{:02}",
            rng.gen_range(2..5),
            rng.gen_range(0..60)
        ),
        page_views: rng.gen_range(500..1500),
        new_sessions: rng.gen_range(50..250),
        goal_completions: rng.gen_range(10..60),
        timestamp: now,
    }
}

/// Description/value/channel pools for one activity category.
#[derive(Debug, Clone)]
pub struct ActivityTemplate {
    pub kind: ActivityKind,
    pub descriptions: &'static [&'static str],
    pub values: &'static [u64],
    pub channels: &'static [&'static str],
}

pub const LOCATIONS: &[&str] = &[
    "New York, US",
    "Los Angeles, US",
    "London, UK",
    "Toronto, CA",
    "Sydney, AU",
    "Berlin, DE",
    "Paris, FR",
    "Tokyo, JP",
    "Singapore, SG",
    "Amsterdam, NL",
];

pub const ACTIVITY_CATALOG: &[ActivityTemplate] = &[
    ActivityTemplate {
        kind: ActivityKind::Conversion,
        descriptions: &[
            "completed a purchase",
            "signed up for newsletter",
            "downloaded whitepaper",
            "requested demo",
            "filled contact form",
        ],
        values: &[25, 50, 75, 100, 150, 200, 300, 500],
        channels: &["Search", "Social Media", "Email", "Direct", "Referral"],
    },
    ActivityTemplate {
        kind: ActivityKind::Signup,
        descriptions: &["created new account", "joined webinar", "subscribed to updates"],
        values: &[],
        channels: &["Social Media", "Search", "Email", "Direct"],
    },
    ActivityTemplate {
        kind: ActivityKind::Purchase,
        descriptions: &["purchased premium plan", "bought product", "upgraded subscription"],
        values: &[99, 199, 299, 499, 999, 1499],
        channels: &["Search", "Email", "Direct", "Social Media"],
    },
    ActivityTemplate {
        kind: ActivityKind::Pageview,
        descriptions: &[
            "viewed pricing page",
            "visited product demo",
            "browsed case studies",
            "checked testimonials",
            "explored features",
        ],
        values: &[],
        channels: &["Search", "Social Media", "Direct", "Referral"],
    },
    ActivityTemplate {
        kind: ActivityKind::Click,
        descriptions: &[
            "clicked CTA button",
            "opened email campaign",
            "clicked social ad",
            "engaged with video",
            "downloaded resource",
        ],
        values: &[],
        channels: &["Email", "Social Media", "Display", "Video"],
    },
];

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn activity_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("activity_{}_{}", now.timestamp_millis(), suffix)
}

/// One synthetic activity. The category is uniform over the catalog; the
/// remaining fields come from that category's pools.
pub fn generate_activity<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> RealTimeActivity {
    let template = &ACTIVITY_CATALOG[rng.gen_range(0..ACTIVITY_CATALOG.len())];
    let description = template.descriptions.choose(rng).copied().unwrap_or_default();
    let channel = template.channels.choose(rng).map(|c| c.to_string());
    let location = LOCATIONS.choose(rng).map(|l| l.to_string());
    let value = template.values.choose(rng).copied();

    RealTimeActivity {
        id: activity_id(now, rng),
        kind: template.kind,
        description: description.to_string(),
        value,
        location,
        channel,
        timestamp: now,
    }
}

pub fn generate_chart_point<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> ChartPoint {
    ChartPoint {
        time: now.format("%H:%M:%S").to_string(),
        timestamp: now.timestamp_millis(),
        revenue: rng.gen_range(500..1500),
        users: rng.gen_range(50..150),
        conversions: rng.gen_range(5..25),
        bounce_rate: rng.gen_range(20..50),
    }
}
