//! Display formatting shared by the CSV and PDF exports (en-US conventions).

/// Group an unsigned integer with `,` every three digits.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole US dollars, e.g. `$8,500` or `-$1,200`.
pub fn currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_digits(rounded.abs() as u64))
}

/// Grouped number with at most three fraction digits, trailing zeros dropped.
pub fn number(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let int_value: u64 = int_part.parse().unwrap_or(0);

    let mut out = String::new();
    if value < 0.0 && (int_value > 0 || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(int_value));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

pub fn count(value: u64) -> String {
    group_digits(value)
}

/// One decimal place plus `%`.
pub fn percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Seconds as `m:ss`.
pub fn duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Human-readable size in 1024 steps, up to two decimals.
pub fn file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(8500.0), "$8,500");
        assert_eq!(currency(1_250_000.4), "$1,250,000");
        assert_eq!(currency(999.5), "$1,000");
        assert_eq!(currency(-1200.0), "-$1,200");
        assert_eq!(currency(-0.2), "$0");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(245_000.0), "245,000");
        assert_eq!(number(1234.5), "1,234.5");
        assert_eq!(number(0.12345), "0.123");
        assert_eq!(number(-42.0), "-42");
        assert_eq!(number(-0.0001), "0");
        assert_eq!(count(1_000), "1,000");
        assert_eq!(count(999), "999");
    }

    #[test]
    fn test_percentage_and_duration() {
        assert_eq!(percentage(1.91), "1.9%");
        assert_eq!(percentage(4.0), "4.0%");
        assert_eq!(duration(185), "3:05");
        assert_eq!(duration(59), "0:59");
    }

    #[test]
    fn test_file_size() {
        assert_eq!(file_size(0), "0 Bytes");
        assert_eq!(file_size(512), "512 Bytes");
        assert_eq!(file_size(1536), "1.5 KB");
        assert_eq!(file_size(2048), "2 KB");
        assert_eq!(file_size(5 * 1024 * 1024 + 1024 * 300), "5.29 MB");
    }
}
