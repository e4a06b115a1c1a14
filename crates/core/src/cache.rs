//! Caller-owned memoization of timeline builds.
//!
//! The builder itself keeps no state. A `TimelineCache` remembers the last
//! input fingerprint and its output so a render loop only pays for a build
//! when versions, snapshots, the active version or the config changed.

use crate::config::TimelineConfig;
use crate::hashing::fingerprint;
use crate::packaging::TimelineInput;
use crate::timeline::{build_timeline_for, VirtualPeriod};

#[derive(Debug, Default)]
pub struct TimelineCache {
    key: Option<String>,
    rows: Vec<VirtualPeriod>,
    builds: u64,
}

impl TimelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the timeline for `input`, rebuilding only when its
    /// fingerprint differs from the cached one.
    pub fn get_or_build(&mut self, input: &TimelineInput, config: &TimelineConfig) -> &[VirtualPeriod] {
        let key = match fingerprint(input, config) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(error = %e, "Timeline fingerprint failed, rebuilding uncached");
                None
            }
        };

        let fresh = key.is_some() && key == self.key;
        if !fresh {
            self.rows = build_timeline_for(input, config);
            self.builds += 1;
            self.key = key;
        }
        &self.rows
    }

    /// Drop the cached output; the next call always rebuilds.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.rows.clear();
    }

    /// Number of builds performed so far.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packaging::{ActiveVersion, PackagingVersion, TrafficSnapshot};

    fn input() -> TimelineInput {
        TimelineInput {
            versions: vec![PackagingVersion {
                version_number: 1,
                start_date: Some(1_000),
                end_date: None,
                active_periods: None,
                configuration_snapshot: serde_json::json!({}),
            }],
            snapshots: vec![TrafficSnapshot {
                version: 1,
                timestamp: 2_000,
                packaging_snapshot: None,
            }],
            active_version: ActiveVersion::Version(1),
        }
    }

    #[test]
    fn identical_input_builds_once() {
        let mut cache = TimelineCache::new();
        let config = TimelineConfig::default();
        let first = cache.get_or_build(&input(), &config).to_vec();
        let second = cache.get_or_build(&input(), &config).to_vec();
        assert_eq!(first, second);
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn changed_input_rebuilds() {
        let mut cache = TimelineCache::new();
        let config = TimelineConfig::default();
        cache.get_or_build(&input(), &config);

        let mut changed = input();
        changed.active_version = ActiveVersion::Draft;
        let rows = cache.get_or_build(&changed, &config).to_vec();
        assert_eq!(cache.builds(), 2);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = TimelineCache::new();
        let config = TimelineConfig::default();
        cache.get_or_build(&input(), &config);
        cache.invalidate();
        cache.get_or_build(&input(), &config);
        assert_eq!(cache.builds(), 2);
    }
}
