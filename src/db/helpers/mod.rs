use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Storage format for every timestamp column. Values are UTC; the fraction is
/// written only when the instant has one.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. Naive values are taken as UTC; RFC 3339 values
/// are converted to UTC.
pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field} '{value}'"))
}

pub fn check_duration(value: f64, field: &str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(anyhow!("{field} contains invalid duration {value}"));
    }
    Ok(value)
}
