use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Shown in place of a timestamp that is missing or cannot be parsed.
pub const DATE_PLACEHOLDER: &str = "Date N/A";

/// Formats the age of `timestamp` relative to `now`.
///
/// - under 60 seconds (including timestamps in the future): `"just now"`
/// - under an hour: `"<n>m ago"`
/// - under a day: `"<n>h ago"`
/// - otherwise a short date such as `"Mar 04, 2026"`
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds();

    if diff < 60 {
        return "just now".to_string();
    }
    if diff < 3600 {
        return format!("{}m ago", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h ago", diff / 3600);
    }

    timestamp.format("%b %d, %Y").to_string()
}

/// Parses the timestamp formats seen in feed files.
///
/// Accepts RFC 3339 (`2026-03-04T10:00:00Z`), RFC 2822 (`Wed, 04 Mar 2026 10:00:00 +0000`),
/// naive `YYYY-MM-DD HH:MM:SS` (taken as UTC) and a bare `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Display text for an optional raw timestamp, falling back to [`DATE_PLACEHOLDER`].
pub fn format_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> String {
    match raw.and_then(parse_timestamp) {
        Some(ts) => relative_time(ts, now),
        None => {
            if let Some(raw) = raw {
                tracing::debug!(timestamp = %raw, "Unparseable article timestamp");
            }
            DATE_PLACEHOLDER.to_string()
        }
    }
}
