//! Derived campaign rates. Zero denominators yield 0 rather than NaN/inf.

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Click-through rate in percent, 2 decimals.
pub fn ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    round_to(clicks as f64 / impressions as f64 * 100.0, 2)
}

/// Cost per click, 2 decimals.
pub fn cpc(spent: f64, clicks: u64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }
    round_to(spent / clicks as f64, 2)
}

/// Return on ad spend as the dashboard has always computed it:
/// `conversions × 100 / spent`, 1 decimal. This is not revenue / spend.
pub fn roas(conversions: u64, spent: f64) -> f64 {
    if spent <= 0.0 {
        return 0.0;
    }
    round_to(conversions as f64 * 100.0 / spent, 1)
}
