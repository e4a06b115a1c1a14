//! Date and tooltip formatting for timeline rows and snapshot drill-downs.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::config::TimelineConfig;
use crate::types::EpochMillis;

/// Rendered in place of a date when the timestamp cannot be represented.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Short `MMM D` form used in row labels.
const SHORT_FORMAT: &str = "%b %-d";

/// Full form used in hover tooltips, e.g. `Jan 5, 2024, 3:04 PM`.
const FULL_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// A timestamp rendered for a row label plus its tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotDate {
    pub display: String,
    pub tooltip: String,
}

fn localize(timestamp: EpochMillis, config: &TimelineConfig) -> Option<DateTime<FixedOffset>> {
    let offset = config
        .display_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)?;
    DateTime::<Utc>::from_timestamp_millis(timestamp).map(|utc| utc.with_timezone(&offset))
}

fn format_with(timestamp: EpochMillis, config: &TimelineConfig, pattern: &str) -> String {
    localize(timestamp, config)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// `MMM D`, e.g. `Jan 5`.
pub fn format_short_date(timestamp: EpochMillis, config: &TimelineConfig) -> String {
    format_with(timestamp, config, SHORT_FORMAT)
}

/// Month, day, year and time, e.g. `Jan 5, 2024, 3:04 PM`.
pub fn format_full_date(timestamp: EpochMillis, config: &TimelineConfig) -> String {
    format_with(timestamp, config, FULL_FORMAT)
}

/// Format a snapshot timestamp for display. Pure, never panics.
pub fn format_snapshot_date(timestamp: EpochMillis, config: &TimelineConfig) -> SnapshotDate {
    SnapshotDate {
        display: format_short_date(timestamp, config),
        tooltip: format_full_date(timestamp, config),
    }
}

/// `Active: Jan 5 – Jan 9` for closed periods, `Active since Jan 5` otherwise.
pub fn format_period_tooltip(
    start: EpochMillis,
    end: Option<EpochMillis>,
    config: &TimelineConfig,
) -> String {
    let start_display = format_short_date(start, config);
    match end {
        Some(end) => format!(
            "Active: {start_display} \u{2013} {}",
            format_short_date(end, config)
        ),
        None => format!("Active since {start_display}"),
    }
}
