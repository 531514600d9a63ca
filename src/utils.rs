// Formatting helpers shared by the report sections
use chrono::{DateTime, FixedOffset, Utc};

/// Renders the header timestamp in the report zone, e.g. `2024-05-01 14:30 WAT`.
pub fn format_timestamp(now: DateTime<Utc>, offset: FixedOffset, label: &str) -> String {
    format!("{} {}", now.with_timezone(&offset).format("%Y-%m-%d %H:%M"), label)
}

/// `12.34%`, or `n/a` when the provider reported nothing.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) => format!("{:.2}%", c),
        None => "n/a".to_string(),
    }
}

/// Like [`format_change`] but with an explicit `+` for non-negative values.
pub fn format_signed_change(change: Option<f64>) -> String {
    match change {
        Some(c) if c >= 0.0 => format!("+{:.2}%", c.abs()),
        other => format_change(other),
    }
}

pub fn to_billions(value: f64) -> f64 {
    value / 1e9
}

pub fn to_millions(value: f64) -> f64 {
    value / 1e6
}
