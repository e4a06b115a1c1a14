//! Consistency checks over version history and snapshots.
//!
//! The timeline builder tolerates every issue reported here; the checks
//! exist so upstream data-entry bugs surface in logs instead of silently
//! vanishing from the rendered timeline.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::packaging::{PackagingVersion, TrafficSnapshot};
use crate::types::{EpochMillis, VersionNumber};

/// A single inconsistency found in the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryIssue {
    /// The same version number has more than one record. The first wins.
    DuplicateVersion { version: VersionNumber },
    /// More than one version has an open activation window.
    MultipleOpenPeriods { versions: Vec<VersionNumber> },
    /// A window ends before it starts.
    InvertedPeriod {
        version: VersionNumber,
        start: EpochMillis,
        end: EpochMillis,
    },
    /// A record has neither active periods nor a usable legacy start date.
    MissingStartDate { version: VersionNumber },
    /// A snapshot of a deleted version carries no embedded period start.
    UngroupedDeletedSnapshot {
        version: VersionNumber,
        timestamp: EpochMillis,
    },
}

impl std::fmt::Display for HistoryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateVersion { version } => {
                write!(f, "version {version} has duplicate records")
            }
            Self::MultipleOpenPeriods { versions } => {
                write!(f, "versions {versions:?} all have open periods")
            }
            Self::InvertedPeriod {
                version,
                start,
                end,
            } => write!(f, "version {version} has a period ending at {end} before its start {start}"),
            Self::MissingStartDate { version } => {
                write!(f, "version {version} has no usable start date")
            }
            Self::UngroupedDeletedSnapshot { version, timestamp } => write!(
                f,
                "snapshot at {timestamp} of deleted version {version} has no period metadata"
            ),
        }
    }
}

/// Collect every inconsistency in the inputs, in a stable order.
pub fn check_history(
    versions: &[PackagingVersion],
    snapshots: &[TrafficSnapshot],
) -> Vec<HistoryIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for v in versions {
        if !seen.insert(v.version_number) && !duplicates.contains(&v.version_number) {
            duplicates.push(v.version_number);
        }
    }
    issues.extend(
        duplicates
            .into_iter()
            .map(|version| HistoryIssue::DuplicateVersion { version }),
    );

    let mut open_versions: Vec<VersionNumber> = Vec::new();
    for v in versions {
        if !v.has_multi_periods() && v.legacy_start().is_none() {
            issues.push(HistoryIssue::MissingStartDate {
                version: v.version_number,
            });
        }
        for period in v.recorded_periods() {
            match period.end_date {
                None => {
                    if !open_versions.contains(&v.version_number) {
                        open_versions.push(v.version_number);
                    }
                }
                Some(end) if end < period.start_date => {
                    issues.push(HistoryIssue::InvertedPeriod {
                        version: v.version_number,
                        start: period.start_date,
                        end,
                    });
                }
                Some(_) => {}
            }
        }
    }
    if open_versions.len() > 1 {
        issues.push(HistoryIssue::MultipleOpenPeriods {
            versions: open_versions,
        });
    }

    let mut first_ungrouped: HashMap<VersionNumber, EpochMillis> = HashMap::new();
    for s in snapshots.iter().filter(|s| !seen.contains(&s.version)) {
        let has_start = s
            .packaging_snapshot
            .is_some_and(|meta| meta.period_start.is_some());
        if !has_start {
            first_ungrouped
                .entry(s.version)
                .and_modify(|ts| *ts = (*ts).min(s.timestamp))
                .or_insert(s.timestamp);
        }
    }
    let mut ungrouped: Vec<(VersionNumber, EpochMillis)> = first_ungrouped.into_iter().collect();
    ungrouped.sort_unstable();
    issues.extend(
        ungrouped
            .into_iter()
            .map(|(version, timestamp)| HistoryIssue::UngroupedDeletedSnapshot { version, timestamp }),
    );

    issues
}

/// Emit one structured warning per issue.
pub fn log_issues(issues: &[HistoryIssue]) {
    for issue in issues {
        tracing::warn!(issue = %issue, "Inconsistent packaging history");
    }
}
