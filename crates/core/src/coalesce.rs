//! Period coalescing for versions with multiple activation windows.
//!
//! Saving a no-op draft closes a version's period and immediately reopens
//! it, leaving two adjacent closed windows that really describe one
//! activation. Adjacent closed windows are merged unless another version was
//! live in the gap between them, in which case the split is a genuine
//! restoration. The open (live) window is never folded into its predecessor
//! so the current row always starts at the latest activation.

use crate::config::TimelineConfig;
use crate::packaging::{ActivePeriod, PackagingVersion};
use crate::types::{EpochMillis, VersionNumber};

// ---------------------------------------------------------------------------
// Global active timeline
// ---------------------------------------------------------------------------

/// One activation window of one version, on the cross-version timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub version: VersionNumber,
    pub period: ActivePeriod,
}

/// Every recorded activation window across the whole history.
///
/// Versions without a usable window contribute nothing. Deleted versions
/// have no record and so never appear here.
pub fn global_active_timeline<'a, I>(versions: I) -> Vec<TimelineEntry>
where
    I: IntoIterator<Item = &'a PackagingVersion>,
{
    versions
        .into_iter()
        .flat_map(|v| {
            v.recorded_periods()
                .into_iter()
                .map(move |period| TimelineEntry {
                    version: v.version_number,
                    period,
                })
        })
        .collect()
}

/// Milliseconds by which `period` overlaps `[gap_start, gap_end]`.
/// Open periods count as active until the end of time. Negative when disjoint.
pub fn overlap_ms(period: &ActivePeriod, gap_start: EpochMillis, gap_end: EpochMillis) -> i64 {
    let period_end = period.end_date.unwrap_or(EpochMillis::MAX);
    period_end
        .min(gap_end)
        .saturating_sub(period.start_date.max(gap_start))
}

/// Whether some other version was live for longer than the overlap
/// threshold during `[gap_start, gap_end]`.
pub fn is_interrupted(
    version: VersionNumber,
    gap_start: EpochMillis,
    gap_end: EpochMillis,
    global: &[TimelineEntry],
    config: &TimelineConfig,
) -> bool {
    global
        .iter()
        .filter(|entry| entry.version != version)
        .any(|entry| overlap_ms(&entry.period, gap_start, gap_end) > config.overlap_threshold_ms)
}

// ---------------------------------------------------------------------------
// Coalescing
// ---------------------------------------------------------------------------

/// Merge adjacent closed windows of `version` that no other version
/// interrupted.
///
/// Input order does not matter; the result is sorted by start ascending.
pub fn coalesce_periods(
    version: VersionNumber,
    periods: &[ActivePeriod],
    global: &[TimelineEntry],
    config: &TimelineConfig,
) -> Vec<ActivePeriod> {
    let mut sorted = periods.to_vec();
    sorted.sort_by_key(|p| p.start_date);

    let mut remaining = sorted.into_iter();
    let Some(mut current) = remaining.next() else {
        return Vec::new();
    };

    let mut coalesced = Vec::new();
    for next in remaining {
        let Some(current_end) = current.end_date else {
            // An open window can only be followed by another if the history
            // is inconsistent; keep both rather than guess.
            coalesced.push(current);
            current = next;
            continue;
        };

        let Some(next_end) = next.end_date else {
            coalesced.push(current);
            current = next;
            continue;
        };

        if is_interrupted(version, current_end, next.start_date, global, config) {
            tracing::debug!(
                version,
                gap_start = current_end,
                gap_end = next.start_date,
                "Keeping restoration split"
            );
            coalesced.push(current);
            current = next;
        } else {
            tracing::debug!(
                version,
                gap_start = current_end,
                gap_end = next.start_date,
                "Merging uninterrupted periods"
            );
            current.end_date = Some(next_end.max(current_end));
        }
    }
    coalesced.push(current);
    coalesced
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
