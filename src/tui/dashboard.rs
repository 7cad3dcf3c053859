//! Dashboard utilities — display formatting.

use chrono::{DateTime, Local};

use crate::controller::log;

/// Format a log timestamp as HH:MM:SS local time.
pub fn format_clock(ts: &DateTime<Local>) -> String {
    ts.format("%H:%M:%S").to_string()
}

/// Format a post timestamp for the feed. Server timestamps are ISO 8601;
/// anything unparsable is shown raw rather than dropped.
pub fn format_post_time(ts: &str) -> String {
    match log::parse_server_timestamp(ts) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

/// Format a response-rate percentage, server-rounded.
pub fn format_rate(rate: f64) -> String {
    format!("{}%", rate.round() as i64)
}

/// Format a counter for human display.
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 10_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        format!("{count}")
    }
}
