//! Final ordering and restoration badges for timeline rows.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::packaging::ActiveVersion;
use crate::timeline::VirtualPeriod;
use crate::types::VersionNumber;

/// Whether `period` is the live, currently active row.
pub fn is_live(period: &VirtualPeriod, active_version: ActiveVersion) -> bool {
    active_version.is(period.display_version) && period.is_open()
}

/// How many rows each version occupies.
pub fn version_frequencies(periods: &[VirtualPeriod]) -> HashMap<VersionNumber, usize> {
    let mut frequency = HashMap::new();
    for period in periods {
        *frequency.entry(period.display_version).or_insert(0) += 1;
    }
    frequency
}

/// Display order: the live row first, then newest start first. Ties fall
/// back to the higher version number so the order is total.
pub fn compare_periods(a: &VirtualPeriod, b: &VirtualPeriod, active_version: ActiveVersion) -> Ordering {
    is_live(b, active_version)
        .cmp(&is_live(a, active_version))
        .then_with(|| b.effective_date.cmp(&a.effective_date))
        .then_with(|| b.display_version.cmp(&a.display_version))
        .then_with(|| a.restoration_index.cmp(&b.restoration_index))
}

/// Sort rows for display and set [`VirtualPeriod::show_restored`] on every
/// row of a version that appears more than once.
pub fn decorate(mut periods: Vec<VirtualPeriod>, active_version: ActiveVersion) -> Vec<VirtualPeriod> {
    let frequency = version_frequencies(&periods);

    periods.sort_by(|a, b| compare_periods(a, b, active_version));
    for period in &mut periods {
        period.show_restored = frequency
            .get(&period.display_version)
            .is_some_and(|&count| count > 1);
    }
    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EpochMillis;

    fn row(version: VersionNumber, start: EpochMillis, end: Option<EpochMillis>) -> VirtualPeriod {
        VirtualPeriod {
            display_version: version,
            period_start: start,
            period_end: end,
            effective_date: start,
            is_restored: false,
            restoration_index: 0,
            is_deleted: false,
            show_restored: false,
            tooltip: String::new(),
        }
    }

    fn order(periods: &[VirtualPeriod]) -> Vec<(VersionNumber, EpochMillis)> {
        periods
            .iter()
            .map(|p| (p.display_version, p.effective_date))
            .collect()
    }

    #[test]
    fn live_row_pinned_above_newer_rows() {
        let rows = vec![row(5, 9_000, Some(10_000)), row(3, 1_000, None)];
        let out = decorate(rows, ActiveVersion::Version(3));
        assert_eq!(order(&out), vec![(3, 1_000), (5, 9_000)]);
    }

    #[test]
    fn closed_row_of_active_version_is_not_pinned() {
        let rows = vec![row(5, 9_000, None), row(3, 1_000, Some(2_000))];
        let out = decorate(rows, ActiveVersion::Version(3));
        assert_eq!(order(&out), vec![(5, 9_000), (3, 1_000)]);
    }

    #[test]
    fn draft_pins_nothing() {
        let rows = vec![row(1, 1_000, None), row(2, 5_000, Some(6_000))];
        let out = decorate(rows, ActiveVersion::Draft);
        assert_eq!(order(&out), vec![(2, 5_000), (1, 1_000)]);
    }

    #[test]
    fn reverse_chronological_otherwise() {
        let rows = vec![
            row(1, 1_000, Some(2_000)),
            row(3, 3_000, Some(4_000)),
            row(2, 2_000, Some(3_000)),
        ];
        let out = decorate(rows, ActiveVersion::Draft);
        assert_eq!(order(&out), vec![(3, 3_000), (2, 2_000), (1, 1_000)]);
    }

    #[test]
    fn equal_dates_order_by_version() {
        let rows = vec![row(1, 1_000, Some(2_000)), row(2, 1_000, Some(2_000))];
        let out = decorate(rows, ActiveVersion::Draft);
        assert_eq!(order(&out), vec![(2, 1_000), (1, 1_000)]);
    }

    #[test]
    fn show_restored_marks_every_row_of_repeated_version() {
        let rows = vec![
            row(1, 5_000, None),
            row(2, 3_000, Some(5_000)),
            row(1, 1_000, Some(3_000)),
        ];
        let out = decorate(rows, ActiveVersion::Version(1));
        let badges: Vec<(VersionNumber, bool)> =
            out.iter().map(|p| (p.display_version, p.show_restored)).collect();
        assert_eq!(badges, vec![(1, true), (2, false), (1, true)]);
    }

    #[test]
    fn frequencies_count_rows() {
        let rows = vec![row(1, 0, None), row(1, 10, Some(20)), row(4, 5, Some(6))];
        let frequency = version_frequencies(&rows);
        assert_eq!(frequency[&1], 2);
        assert_eq!(frequency[&4], 1);
        assert!(!frequency.contains_key(&2));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(decorate(Vec::new(), ActiveVersion::Version(1)).is_empty());
    }
}
