//! Packaging version timeline derivation.
//!
//! Turns version records and traffic snapshots into "virtual periods": one
//! row per contiguous span during which a version was the live packaging.
//! Versions whose record was deleted are reconstructed from the period
//! metadata their snapshots carry.
//!
//! The derivation is pure and infallible. Malformed records are dropped from
//! the output and reported through [`crate::diagnostics`].

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::coalesce::{coalesce_periods, global_active_timeline, TimelineEntry};
use crate::config::TimelineConfig;
use crate::decorate::decorate;
use crate::diagnostics::{check_history, log_issues, HistoryIssue};
use crate::display::format_period_tooltip;
use crate::lookup::count_matching_snapshots;
use crate::packaging::{
    ActivePeriod, ActiveVersion, PackagingSnapshotMeta, PackagingVersion, TimelineInput,
    TrafficSnapshot,
};
use crate::types::{EpochMillis, VersionNumber};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One rendered timeline row. Derived on every build, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPeriod {
    pub display_version: VersionNumber,
    pub period_start: EpochMillis,
    /// `None` while the period is still open.
    pub period_end: Option<EpochMillis>,
    /// Sort key; always equal to `period_start`.
    pub effective_date: EpochMillis,
    /// `true` for every occurrence of a version except its newest.
    pub is_restored: bool,
    /// 0 for the newest occurrence of the version, counting up into the past.
    pub restoration_index: usize,
    /// The version record no longer exists; rebuilt from snapshots.
    pub is_deleted: bool,
    /// The version occupies more than one row of the timeline.
    pub show_restored: bool,
    pub tooltip: String,
}

impl VirtualPeriod {
    pub fn is_open(&self) -> bool {
        self.period_end.is_none()
    }
}

/// Where a version's rows come from.
#[derive(Debug, Clone, Copy)]
enum VersionSource<'a> {
    Recorded(&'a PackagingVersion),
    Deleted(VersionNumber),
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Sorted timeline rows together with the history issues found while
/// deriving them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBuild {
    pub rows: Vec<VirtualPeriod>,
    pub issues: Vec<HistoryIssue>,
}

/// Derive the sorted, decorated timeline.
pub fn build_timeline(
    versions: &[PackagingVersion],
    snapshots: &[TrafficSnapshot],
    active_version: ActiveVersion,
    config: &TimelineConfig,
) -> Vec<VirtualPeriod> {
    build_timeline_with_issues(versions, snapshots, active_version, config).rows
}

/// [`build_timeline`] over a bundled [`TimelineInput`].
pub fn build_timeline_for(input: &TimelineInput, config: &TimelineConfig) -> Vec<VirtualPeriod> {
    build_timeline(&input.versions, &input.snapshots, input.active_version, config)
}

/// [`build_timeline`], also returning the issues it logged. The history is
/// checked once per call.
pub fn build_timeline_with_issues(
    versions: &[PackagingVersion],
    snapshots: &[TrafficSnapshot],
    active_version: ActiveVersion,
    config: &TimelineConfig,
) -> TimelineBuild {
    let issues = check_history(versions, snapshots);
    log_issues(&issues);

    let periods = derive_periods(versions, snapshots, active_version, config);
    let rows = decorate(periods, active_version);
    tracing::debug!(
        versions = versions.len(),
        snapshots = snapshots.len(),
        rows = rows.len(),
        issues = issues.len(),
        active_version = %active_version,
        "Built packaging timeline"
    );
    TimelineBuild { rows, issues }
}

/// Derive every displayable period, unsorted and without
/// [`VirtualPeriod::show_restored`] set.
pub fn build_periods(
    versions: &[PackagingVersion],
    snapshots: &[TrafficSnapshot],
    active_version: ActiveVersion,
    config: &TimelineConfig,
) -> Vec<VirtualPeriod> {
    log_issues(&check_history(versions, snapshots));
    derive_periods(versions, snapshots, active_version, config)
}

fn derive_periods(
    versions: &[PackagingVersion],
    snapshots: &[TrafficSnapshot],
    active_version: ActiveVersion,
    config: &TimelineConfig,
) -> Vec<VirtualPeriod> {
    let recorded = first_records(versions);
    let global = global_active_timeline(recorded.iter().copied());

    let mut sources: Vec<VersionSource<'_>> =
        recorded.iter().copied().map(VersionSource::Recorded).collect();
    sources.extend(
        deleted_versions(&recorded, snapshots)
            .into_iter()
            .map(VersionSource::Deleted),
    );

    sources
        .into_iter()
        .flat_map(|source| match source {
            VersionSource::Recorded(version) => {
                recorded_version_periods(version, snapshots, active_version, &global, config)
            }
            VersionSource::Deleted(version) => deleted_periods(version, snapshots, config),
        })
        .collect()
}

/// One record per version number; the first occurrence wins.
fn first_records(versions: &[PackagingVersion]) -> Vec<&PackagingVersion> {
    let mut seen = HashSet::new();
    versions
        .iter()
        .filter(|v| seen.insert(v.version_number))
        .collect()
}

/// Version numbers that only appear in snapshots, ascending.
fn deleted_versions(
    recorded: &[&PackagingVersion],
    snapshots: &[TrafficSnapshot],
) -> BTreeSet<VersionNumber> {
    let live: HashSet<VersionNumber> = recorded.iter().map(|v| v.version_number).collect();
    snapshots
        .iter()
        .map(|s| s.version)
        .filter(|version| !live.contains(version))
        .collect()
}

// ---------------------------------------------------------------------------
// Recorded versions
// ---------------------------------------------------------------------------

fn recorded_version_periods(
    version: &PackagingVersion,
    snapshots: &[TrafficSnapshot],
    active_version: ActiveVersion,
    global: &[TimelineEntry],
    config: &TimelineConfig,
) -> Vec<VirtualPeriod> {
    let number = version.version_number;
    let has_traffic = |period: &ActivePeriod| {
        count_matching_snapshots(snapshots, number, period.start_date, period.end_date, config) > 0
    };

    let kept: Vec<ActivePeriod> = match version.active_periods.as_deref() {
        Some(periods) if !periods.is_empty() => coalesce_periods(number, periods, global, config)
            .into_iter()
            .filter(|period| {
                let keep = period.is_open() || has_traffic(period);
                if !keep {
                    tracing::debug!(
                        version = number,
                        start = period.start_date,
                        "Dropping period without traffic"
                    );
                }
                keep
            })
            .collect(),
        _ => match version.legacy_start() {
            Some(start) => {
                let period = ActivePeriod::new(start, version.end_date);
                if active_version.is(number) || has_traffic(&period) {
                    vec![period]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        },
    };

    to_virtual_periods(number, kept, false, config)
}

// ---------------------------------------------------------------------------
// Deleted versions
// ---------------------------------------------------------------------------

/// Snapshot timestamps seen under one embedded period key.
#[derive(Debug, Clone, Copy)]
struct SnapshotGroup {
    earliest: EpochMillis,
    latest: EpochMillis,
}

/// Rebuild a deleted version's periods from its snapshots, one period per
/// distinct embedded period key. The newest group is shown as open so its
/// phrasing matches a live version.
fn deleted_periods(
    version: VersionNumber,
    snapshots: &[TrafficSnapshot],
    config: &TimelineConfig,
) -> Vec<VirtualPeriod> {
    let mut groups: HashMap<PackagingSnapshotMeta, SnapshotGroup> = HashMap::new();
    for s in snapshots.iter().filter(|s| s.version == version) {
        let key = s.packaging_snapshot.unwrap_or_default();
        groups
            .entry(key)
            .and_modify(|g| {
                g.earliest = g.earliest.min(s.timestamp);
                g.latest = g.latest.max(s.timestamp);
            })
            .or_insert(SnapshotGroup {
                earliest: s.timestamp,
                latest: s.timestamp,
            });
    }

    let mut periods: Vec<ActivePeriod> = groups
        .into_iter()
        .map(|(key, group)| {
            ActivePeriod::new(
                key.period_start.unwrap_or(group.earliest),
                Some(key.period_end.unwrap_or(group.latest)),
            )
        })
        .collect();
    periods.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.end_date.cmp(&a.end_date))
    });
    if let Some(newest) = periods.first_mut() {
        newest.end_date = None;
    }

    to_virtual_periods(version, periods, true, config)
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// Number a version's kept periods newest-first and render their tooltips.
fn to_virtual_periods(
    version: VersionNumber,
    mut periods: Vec<ActivePeriod>,
    is_deleted: bool,
    config: &TimelineConfig,
) -> Vec<VirtualPeriod> {
    periods.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    periods
        .into_iter()
        .enumerate()
        .map(|(index, period)| VirtualPeriod {
            display_version: version,
            period_start: period.start_date,
            period_end: period.end_date,
            effective_date: period.start_date,
            is_restored: index > 0,
            restoration_index: index,
            is_deleted,
            show_restored: false,
            tooltip: format_period_tooltip(period.start_date, period.end_date, config),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
