//! Display formatting helpers for the report output.

use crate::models::QuantityStats;

/// Group the digits of an integer with thousands separators.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::format_grouped;
///
/// assert_eq!(format_grouped(0), "0");
/// assert_eq!(format_grouped(1234567), "1,234,567");
/// ```
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Compact large numbers with K/M suffixes, one decimal place.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950), "950");
/// assert_eq!(format_compact(5_300), "5.3K");
/// assert_eq!(format_compact(1_234_567), "1.2M");
/// ```
pub fn format_compact(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Drop rate as a percentage with two decimals, e.g. `"12.50%"`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate)
}

/// One drop-statistics line: `"12.50%, avg: 1.5, range: 1-3"`.
pub fn format_drop_stats(rate: f64, stats: &QuantityStats) -> String {
    format!(
        "{:.2}%, avg: {:.1}, range: {}",
        rate,
        stats.mean,
        stats.range_display()
    )
}

/// Elapsed session time as `HH:MM:SS`. Negative input clamps to zero.
pub fn format_session_time(elapsed_secs: i64) -> String {
    let total = elapsed_secs.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
