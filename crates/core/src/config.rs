//! Timeline policy configuration.
//!
//! The snapshot tolerance and overlap threshold are product policy rather
//! than invariants of the data model, so they live here instead of being
//! hard-coded in the builder.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Slack applied on both sides of a period when matching snapshots to it.
pub const DEFAULT_SNAPSHOT_TOLERANCE_MS: i64 = 5_000;

/// Minimum overlap another version must have with a gap for the gap to
/// count as an interruption (a genuine restoration).
pub const DEFAULT_OVERLAP_THRESHOLD_MS: i64 = 1_000;

/// Dates render in UTC unless an offset is configured.
pub const DEFAULT_DISPLAY_OFFSET_MINUTES: i32 = 0;

/// Largest tolerance or threshold accepted (one day).
pub const MAX_WINDOW_MS: i64 = 86_400_000;

/// Largest absolute UTC offset accepted for date display.
pub const MAX_DISPLAY_OFFSET_MINUTES: i32 = 18 * 60;

// ---------------------------------------------------------------------------
// TimelineConfig
// ---------------------------------------------------------------------------

/// Policy knobs for timeline derivation and date display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Snapshot matching slack in milliseconds (default: `5000`).
    pub snapshot_tolerance_ms: i64,
    /// Gap overlap required to split a version's periods (default: `1000`).
    pub overlap_threshold_ms: i64,
    /// Fixed UTC offset used for display strings (default: `0`).
    pub display_offset_minutes: i32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            snapshot_tolerance_ms: DEFAULT_SNAPSHOT_TOLERANCE_MS,
            overlap_threshold_ms: DEFAULT_OVERLAP_THRESHOLD_MS,
            display_offset_minutes: DEFAULT_DISPLAY_OFFSET_MINUTES,
        }
    }
}

impl TimelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default |
    /// |-----------------------------------|---------|
    /// | `TIMELINE_SNAPSHOT_TOLERANCE_MS`  | `5000`  |
    /// | `TIMELINE_OVERLAP_THRESHOLD_MS`   | `1000`  |
    /// | `TIMELINE_DISPLAY_OFFSET_MINUTES` | `0`     |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys fall back to
    /// their defaults; set keys must parse and pass [`validate`](Self::validate).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            snapshot_tolerance_ms: parse_var(
                &lookup,
                "TIMELINE_SNAPSHOT_TOLERANCE_MS",
                defaults.snapshot_tolerance_ms,
            )?,
            overlap_threshold_ms: parse_var(
                &lookup,
                "TIMELINE_OVERLAP_THRESHOLD_MS",
                defaults.overlap_threshold_ms,
            )?,
            display_offset_minutes: parse_var(
                &lookup,
                "TIMELINE_DISPLAY_OFFSET_MINUTES",
                defaults.display_offset_minutes,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_window(self.snapshot_tolerance_ms, "snapshot_tolerance_ms")?;
        validate_window(self.overlap_threshold_ms, "overlap_threshold_ms")?;

        if self.display_offset_minutes.unsigned_abs() > MAX_DISPLAY_OFFSET_MINUTES.unsigned_abs() {
            return Err(CoreError::Validation(format!(
                "display_offset_minutes must be within ±{MAX_DISPLAY_OFFSET_MINUTES}, got {}",
                self.display_offset_minutes
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CoreError::Validation(format!("{key} must be an integer, got '{raw}'"))
        }),
    }
}

fn validate_window(value: i64, name: &str) -> Result<(), CoreError> {
    if !(0..=MAX_WINDOW_MS).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be in [0, {MAX_WINDOW_MS}], got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
