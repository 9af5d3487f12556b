//! Static demo data: campaigns, headline metrics and analytics breakdowns.
//!
//! Campaign rates here are the hand-entered dashboard values, not
//! recomputations of the counters.

use chrono::NaiveDate;
use insights_core::types::*;
use std::collections::BTreeMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn campaign(
    id: &str,
    name: &str,
    channel: Channel,
    status: CampaignStatus,
    (budget, spent): (f64, f64),
    (impressions, clicks, conversions): (u64, u64, u64),
    (ctr, cpc, roas): (f64, f64, f64),
    (start_date, end_date): (NaiveDate, NaiveDate),
    target_audience: &str,
    objective: &str,
) -> Campaign {
    Campaign {
        id: id.into(),
        name: name.into(),
        channel,
        status,
        budget,
        spent,
        impressions,
        clicks,
        conversions,
        ctr,
        cpc,
        roas,
        start_date,
        end_date,
        target_audience: target_audience.into(),
        objective: objective.into(),
    }
}

pub fn campaigns() -> Vec<Campaign> {
    vec![
        campaign(
            "camp_001",
            "Summer Sale 2024 - Social Media Blitz",
            Channel::SocialMedia,
            CampaignStatus::Active,
            (8500.0, 6240.0),
            (245_000, 4680, 312),
            (1.91, 1.33, 5.2),
            (date(2024, 6, 1), date(2024, 8, 31)),
            "Ages 25-45, Fashion & Lifestyle",
            "Drive Sales & Brand Awareness",
        ),
        campaign(
            "camp_002",
            "Q3 Brand Awareness - Display Network",
            Channel::Display,
            CampaignStatus::Active,
            (12000.0, 9800.0),
            (1_250_000, 6250, 425),
            (0.5, 1.57, 3.8),
            (date(2024, 7, 1), date(2024, 9, 30)),
            "Broad Audience, 18-65, High Income",
            "Brand Awareness & Reach",
        ),
        campaign(
            "camp_003",
            "Weekly Newsletter - Customer Retention",
            Channel::Email,
            CampaignStatus::Active,
            (3500.0, 2890.0),
            (85_000, 3400, 510),
            (4.0, 0.85, 7.2),
            (date(2024, 5, 1), date(2024, 12, 31)),
            "Existing Customers & Subscribers",
            "Customer Retention & Upselling",
        ),
        campaign(
            "camp_004",
            "High-Intent Search Campaign",
            Channel::Search,
            CampaignStatus::Active,
            (15000.0, 12400.0),
            (180_000, 7200, 864),
            (4.0, 1.72, 6.8),
            (date(2024, 6, 15), date(2024, 12, 31)),
            "High-Intent Searchers, Purchase Ready",
            "Lead Generation & Sales",
        ),
        campaign(
            "camp_005",
            "Product Demo Video Campaign",
            Channel::Video,
            CampaignStatus::Paused,
            (7500.0, 3200.0),
            (320_000, 2560, 128),
            (0.8, 1.25, 2.4),
            (date(2024, 7, 1), date(2024, 8, 31)),
            "Video Consumers, 18-35, Tech Savvy",
            "Product Education & Awareness",
        ),
        campaign(
            "camp_006",
            "Influencer Partnership - Lifestyle Brand",
            Channel::Influencer,
            CampaignStatus::Active,
            (20000.0, 16500.0),
            (680_000, 10200, 612),
            (1.5, 1.62, 4.9),
            (date(2024, 7, 15), date(2024, 10, 15)),
            "Lifestyle Enthusiasts, 20-40, Social Media Active",
            "Brand Partnership & Authenticity",
        ),
        campaign(
            "camp_007",
            "Black Friday Early Bird Campaign",
            Channel::Search,
            CampaignStatus::Draft,
            (25000.0, 0.0),
            (0, 0, 0),
            (0.0, 0.0, 0.0),
            (date(2024, 11, 1), date(2024, 11, 30)),
            "Deal Seekers, Previous Customers",
            "Holiday Sales Preparation",
        ),
        campaign(
            "camp_008",
            "Retargeting Campaign - Cart Abandoners",
            Channel::Display,
            CampaignStatus::Active,
            (5500.0, 4200.0),
            (95_000, 1900, 285),
            (2.0, 2.21, 8.1),
            (date(2024, 6, 1), date(2024, 12, 31)),
            "Cart Abandoners, Website Visitors",
            "Conversion Recovery",
        ),
    ]
}

fn metric(
    title: &str,
    value: &str,
    change: &str,
    change_type: ChangeType,
    icon: &str,
    trend: &[f64],
) -> MetricData {
    MetricData {
        title: title.into(),
        value: MetricValue::Text(value.into()),
        change: change.into(),
        change_type,
        icon: icon.into(),
        description: "from last month".into(),
        trend: trend.to_vec(),
    }
}

pub fn metrics() -> Vec<MetricData> {
    vec![
        metric(
            "Total Revenue",
            "$127,845.32",
            "+23.5%",
            ChangeType::Positive,
            "DollarSign",
            &[98500.0, 105200.0, 112800.0, 118900.0, 123400.0, 125600.0, 127845.0],
        ),
        metric(
            "Active Users",
            "8,247",
            "+12.8%",
            ChangeType::Positive,
            "Users",
            &[6800.0, 7100.0, 7350.0, 7600.0, 7850.0, 8050.0, 8247.0],
        ),
        metric(
            "Total Conversions",
            "3,156",
            "+18.2%",
            ChangeType::Positive,
            "TrendingUp",
            &[2450.0, 2580.0, 2720.0, 2890.0, 3020.0, 3100.0, 3156.0],
        ),
        metric(
            "Avg. Conversion Rate",
            "4.8%",
            "-0.3%",
            ChangeType::Negative,
            "Zap",
            &[5.2, 5.1, 4.9, 4.8, 4.7, 4.8, 4.8],
        ),
    ]
}

pub fn channel_performance() -> Vec<ChannelPerformance> {
    [
        ("Search Ads", 4850, 15, 3.8, 1.65, 27400.0, 1476),
        ("Social Media", 3920, 12, 1.9, 1.33, 14740.0, 936),
        ("Email Marketing", 3100, 8, 4.0, 0.85, 6390.0, 1020),
        ("Display Ads", 2680, 6, 0.75, 1.89, 14000.0, 710),
        ("Video Ads", 1950, 4, 0.8, 1.25, 10700.0, 256),
    ]
    .into_iter()
    .map(
        |(name, value, campaigns, avg_ctr, avg_cpc, total_spent, conversions)| ChannelPerformance {
            name: name.into(),
            value,
            campaigns,
            avg_ctr,
            avg_cpc,
            total_spent,
            conversions,
        },
    )
    .collect()
}

pub fn conversion_funnel() -> Vec<FunnelStage> {
    [
        ("Impressions", 2_850_000, "awareness", 100.0),
        ("Clicks", 57_000, "interest", 2.0),
        ("Landing Page Views", 51_300, "consideration", 90.0),
        ("Add to Cart", 12_825, "intent", 25.0),
        ("Checkout Started", 7_695, "evaluation", 60.0),
        ("Purchase Completed", 3_156, "conversion", 41.0),
    ]
    .into_iter()
    .map(|(name, value, stage, conversion_rate)| FunnelStage {
        name: name.into(),
        value,
        stage: stage.into(),
        conversion_rate,
    })
    .collect()
}

fn channel_map(values: [f64; 5]) -> BTreeMap<String, f64> {
    ["Search Ads", "Social Media", "Email Marketing", "Display Ads", "Video Ads"]
        .into_iter()
        .map(String::from)
        .zip(values)
        .collect()
}

pub fn industry_benchmarks() -> IndustryBenchmarks {
    IndustryBenchmarks {
        avg_ctr: channel_map([3.17, 1.85, 3.42, 0.63, 0.84]),
        avg_cpc: channel_map([2.12, 1.86, 0.78, 2.14, 1.45]),
        avg_conversion_rate: channel_map([4.2, 2.8, 6.1, 2.1, 1.9]),
    }
}

fn slices(rows: &[(&str, u64, f64)]) -> Vec<ShareSlice> {
    rows.iter()
        .map(|(name, value, percentage)| ShareSlice {
            name: name.to_string(),
            value: *value,
            percentage: *percentage,
        })
        .collect()
}

pub fn geographic() -> Vec<ShareSlice> {
    slices(&[
        ("United States", 45200, 42.5),
        ("Canada", 18900, 17.8),
        ("United Kingdom", 15600, 14.7),
        ("Germany", 12300, 11.6),
        ("Australia", 8900, 8.4),
        ("Other", 5400, 5.0),
    ])
}

pub fn age_groups() -> Vec<ShareSlice> {
    slices(&[
        ("18-24", 1250, 15.2),
        ("25-34", 2890, 35.1),
        ("35-44", 2340, 28.4),
        ("45-54", 1180, 14.3),
        ("55-64", 420, 5.1),
        ("65+", 156, 1.9),
    ])
}

pub fn device_performance() -> Vec<DevicePerformance> {
    [
        ("Mobile", 58.3, 48200, 1840, 3.8, "2:34"),
        ("Desktop", 32.1, 26500, 1156, 4.4, "4:12"),
        ("Tablet", 9.6, 7900, 160, 2.0, "3:45"),
    ]
    .into_iter()
    .map(
        |(name, value, sessions, conversions, conversion_rate, duration)| DevicePerformance {
            name: name.into(),
            value,
            sessions,
            conversions,
            conversion_rate,
            avg_session_duration: duration.into(),
        },
    )
    .collect()
}

pub fn top_keywords() -> Vec<KeywordPerformance> {
    [
        ("digital marketing agency", 45200, 1810, 4.0, 2.1, 3620.0),
        ("social media marketing", 38900, 1556, 4.0, 1.8, 2890.0),
        ("ppc management", 29800, 1192, 4.0, 2.3, 2384.0),
        ("seo services", 52100, 1563, 3.0, 3.2, 1875.0),
        ("content marketing", 34600, 1038, 3.0, 2.9, 1557.0),
        ("email marketing", 28400, 852, 3.0, 2.6, 1278.0),
        ("marketing automation", 19200, 576, 3.0, 3.1, 1152.0),
        ("brand strategy", 15800, 474, 3.0, 2.8, 948.0),
    ]
    .into_iter()
    .map(
        |(keyword, impressions, clicks, ctr, avg_position, cost)| KeywordPerformance {
            keyword: keyword.into(),
            impressions,
            clicks,
            ctr,
            avg_position,
            cost,
        },
    )
    .collect()
}

pub fn competitors() -> Vec<Competitor> {
    let rows: [(&str, f64, f64, f64, &[&str], &str); 4] = [
        (
            "Competitor A",
            28.5,
            2.45,
            85000.0,
            &["digital marketing", "ppc management", "seo services"],
            "High",
        ),
        (
            "Competitor B",
            22.1,
            1.98,
            62000.0,
            &["social media marketing", "content marketing"],
            "Medium",
        ),
        (
            "Competitor C",
            18.7,
            2.12,
            48000.0,
            &["email marketing", "marketing automation"],
            "Medium",
        ),
        (
            "Our Company",
            15.2,
            1.65,
            45000.0,
            &["digital marketing agency", "brand strategy"],
            "High",
        ),
    ];

    rows.into_iter()
        .map(
            |(name, market_share, avg_cpc, estimated_budget, keywords, strength)| Competitor {
                name: name.into(),
                market_share,
                avg_cpc,
                estimated_budget,
                top_keywords: keywords.iter().map(|k| k.to_string()).collect(),
                ad_strength: strength.into(),
            },
        )
        .collect()
}

pub fn ab_test_results() -> Vec<AbTestResult> {
    [
        ("Homepage Hero CTA", "Control", 5240, 262, 5.0, 95, "Winner"),
        ("Homepage Hero CTA", "Variant A", 5180, 337, 6.5, 98, "Winner"),
        ("Email Subject Line", "Control", 12500, 875, 7.0, 85, "Running"),
        ("Email Subject Line", "Variant B", 12300, 984, 8.0, 92, "Running"),
    ]
    .into_iter()
    .map(
        |(test_name, variant, visitors, conversions, conversion_rate, confidence, status)| {
            AbTestResult {
                test_name: test_name.into(),
                variant: variant.into(),
                visitors,
                conversions,
                conversion_rate,
                confidence,
                status: status.into(),
            }
        },
    )
    .collect()
}
