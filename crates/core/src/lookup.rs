//! Snapshot window matching and version lookups.
//!
//! A snapshot belongs to a period when its timestamp falls inside the period
//! widened by the configured tolerance on both ends. Open periods have no
//! upper bound.

use crate::config::TimelineConfig;
use crate::packaging::{PackagingVersion, TrafficSnapshot};
use crate::timeline::VirtualPeriod;
use crate::types::{EpochMillis, VersionNumber};

/// Whether `timestamp` falls inside `[start - tolerance, end + tolerance]`.
pub fn within_window(
    timestamp: EpochMillis,
    start: EpochMillis,
    end: Option<EpochMillis>,
    tolerance_ms: i64,
) -> bool {
    if timestamp < start.saturating_sub(tolerance_ms) {
        return false;
    }
    end.map_or(true, |end| timestamp <= end.saturating_add(tolerance_ms))
}

/// Whether `snapshot` was captured for `version` during the given window.
pub fn snapshot_matches(
    snapshot: &TrafficSnapshot,
    version: VersionNumber,
    start: EpochMillis,
    end: Option<EpochMillis>,
    config: &TimelineConfig,
) -> bool {
    snapshot.version == version
        && within_window(snapshot.timestamp, start, end, config.snapshot_tolerance_ms)
}

/// Number of snapshots of `version` inside the window. Used for ghost filtering.
pub fn count_matching_snapshots(
    snapshots: &[TrafficSnapshot],
    version: VersionNumber,
    start: EpochMillis,
    end: Option<EpochMillis>,
    config: &TimelineConfig,
) -> usize {
    snapshots
        .iter()
        .filter(|s| snapshot_matches(s, version, start, end, config))
        .count()
}

/// Snapshots of `version` inside the window, oldest first.
pub fn get_virtual_version_snapshots<'a>(
    snapshots: &'a [TrafficSnapshot],
    version: VersionNumber,
    start: EpochMillis,
    end: Option<EpochMillis>,
    config: &TimelineConfig,
) -> Vec<&'a TrafficSnapshot> {
    let mut matched: Vec<&TrafficSnapshot> = snapshots
        .iter()
        .filter(|s| snapshot_matches(s, version, start, end, config))
        .collect();
    matched.sort_by_key(|s| s.timestamp);
    matched
}

/// The most recent snapshot captured during a timeline row.
pub fn latest_snapshot_for_period<'a>(
    period: &VirtualPeriod,
    snapshots: &'a [TrafficSnapshot],
    config: &TimelineConfig,
) -> Option<&'a TrafficSnapshot> {
    snapshots
        .iter()
        .filter(|s| {
            snapshot_matches(
                s,
                period.display_version,
                period.period_start,
                period.period_end,
                config,
            )
        })
        .max_by_key(|s| s.timestamp)
}

/// The saved configuration payload for `version`.
///
/// Returns `None` for versions without a record, including deleted versions
/// that only survive in snapshots.
pub fn get_version_snapshot(
    versions: &[PackagingVersion],
    version: VersionNumber,
) -> Option<&serde_json::Value> {
    versions
        .iter()
        .find(|v| v.version_number == version)
        .map(|v| &v.configuration_snapshot)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snap(version: VersionNumber, timestamp: EpochMillis) -> TrafficSnapshot {
        TrafficSnapshot {
            version,
            timestamp,
            packaging_snapshot: None,
        }
    }

    // -- within_window -------------------------------------------------------

    #[test]
    fn window_includes_tolerance_on_both_sides() {
        assert!(within_window(5_000, 10_000, Some(20_000), 5_000));
        assert!(within_window(25_000, 10_000, Some(20_000), 5_000));
        assert!(!within_window(4_999, 10_000, Some(20_000), 5_000));
        assert!(!within_window(25_001, 10_000, Some(20_000), 5_000));
    }

    #[test]
    fn open_window_has_no_upper_bound() {
        assert!(within_window(i64::MAX, 10_000, None, 5_000));
    }

    #[test]
    fn zero_tolerance_is_exact() {
        assert!(within_window(10_000, 10_000, Some(20_000), 0));
        assert!(!within_window(9_999, 10_000, Some(20_000), 0));
    }

    // -- snapshot matching ---------------------------------------------------

    #[test]
    fn match_requires_same_version() {
        let config = TimelineConfig::default();
        assert!(snapshot_matches(&snap(1, 1500), 1, 1000, Some(2000), &config));
        assert!(!snapshot_matches(&snap(2, 1500), 1, 1000, Some(2000), &config));
    }

    #[test]
    fn virtual_version_snapshots_sorted_oldest_first() {
        let snapshots = vec![snap(1, 3000), snap(2, 2000), snap(1, 1500), snap(1, 90_000)];
        let found =
            get_virtual_version_snapshots(&snapshots, 1, 1000, Some(4000), &TimelineConfig::default());
        let stamps: Vec<EpochMillis> = found.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![1500, 3000]);
    }

    #[test]
    fn count_matching_snapshots_counts_window_only() {
        let snapshots = vec![snap(1, 1500), snap(1, 50_000)];
        let config = TimelineConfig::default();
        assert_eq!(count_matching_snapshots(&snapshots, 1, 1000, Some(2000), &config), 1);
        assert_eq!(count_matching_snapshots(&snapshots, 1, 1000, None, &config), 2);
        assert_eq!(count_matching_snapshots(&snapshots, 3, 1000, None, &config), 0);
    }

    // -- get_version_snapshot ------------------------------------------------

    #[test]
    fn version_snapshot_lookup() {
        let versions = vec![PackagingVersion {
            version_number: 1,
            start_date: Some(1000),
            end_date: None,
            active_periods: None,
            configuration_snapshot: json!({"title": "First"}),
        }];
        assert_eq!(get_version_snapshot(&versions, 1).unwrap()["title"], "First");
        assert!(get_version_snapshot(&versions, 2).is_none());
    }
}
