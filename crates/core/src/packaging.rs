//! Packaging version history and traffic snapshot records.
//!
//! These are the shapes the persistence layer hands to the timeline engine.
//! Field names serialize in camelCase to match the stored documents.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EpochMillis, VersionNumber};

/// Literal used for the draft (unsaved) packaging state.
pub const DRAFT_LABEL: &str = "draft";

// ---------------------------------------------------------------------------
// Version history
// ---------------------------------------------------------------------------

/// One activation window of a packaging version. `end_date = None` means the
/// window is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePeriod {
    pub start_date: EpochMillis,
    #[serde(default)]
    pub end_date: Option<EpochMillis>,
}

impl ActivePeriod {
    pub fn new(start_date: EpochMillis, end_date: Option<EpochMillis>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}

/// A saved packaging configuration (title, description, tags, cover image).
///
/// `start_date`/`end_date` are the legacy single-window representation;
/// `active_periods` supersedes them when present and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingVersion {
    pub version_number: VersionNumber,
    #[serde(default)]
    pub start_date: Option<EpochMillis>,
    #[serde(default)]
    pub end_date: Option<EpochMillis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_periods: Option<Vec<ActivePeriod>>,
    #[serde(default)]
    pub configuration_snapshot: serde_json::Value,
}

impl PackagingVersion {
    /// The activation windows recorded for this version, multi-period form
    /// first, legacy window second. Empty when neither is usable.
    pub fn recorded_periods(&self) -> Vec<ActivePeriod> {
        match self.active_periods.as_deref() {
            Some(periods) if !periods.is_empty() => periods.to_vec(),
            _ => self
                .legacy_start()
                .map(|start| vec![ActivePeriod::new(start, self.end_date)])
                .unwrap_or_default(),
        }
    }

    /// The legacy start date, treating `0` the same as absent.
    pub fn legacy_start(&self) -> Option<EpochMillis> {
        self.start_date.filter(|&start| start != 0)
    }

    pub fn has_multi_periods(&self) -> bool {
        self.active_periods
            .as_ref()
            .is_some_and(|periods| !periods.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Traffic snapshots
// ---------------------------------------------------------------------------

/// Period metadata embedded in a snapshot at capture time. Survives deletion
/// of the owning version record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingSnapshotMeta {
    #[serde(default)]
    pub period_start: Option<EpochMillis>,
    #[serde(default)]
    pub period_end: Option<EpochMillis>,
}

/// A point-in-time traffic capture tagged with the version active at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSnapshot {
    pub version: VersionNumber,
    pub timestamp: EpochMillis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_snapshot: Option<PackagingSnapshotMeta>,
}

// ---------------------------------------------------------------------------
// ActiveVersion
// ---------------------------------------------------------------------------

/// The packaging state currently live on the video: a saved version, or the
/// unsaved draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawActiveVersion", into = "RawActiveVersion")]
pub enum ActiveVersion {
    Draft,
    Version(VersionNumber),
}

impl ActiveVersion {
    /// Returns `true` when `version` is the live saved version.
    pub fn is(&self, version: VersionNumber) -> bool {
        matches!(self, Self::Version(v) if *v == version)
    }
}

impl std::fmt::Display for ActiveVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => f.write_str(DRAFT_LABEL),
            Self::Version(v) => write!(f, "{v}"),
        }
    }
}

impl std::str::FromStr for ActiveVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == DRAFT_LABEL {
            return Ok(Self::Draft);
        }
        trimmed.parse().map(Self::Version).map_err(|_| {
            CoreError::Validation(format!(
                "Active version must be a version number or '{DRAFT_LABEL}', got '{s}'"
            ))
        })
    }
}

/// Wire form: either a bare integer or the `"draft"` literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawActiveVersion {
    Number(VersionNumber),
    Label(String),
}

impl TryFrom<RawActiveVersion> for ActiveVersion {
    type Error = CoreError;

    fn try_from(raw: RawActiveVersion) -> Result<Self, Self::Error> {
        match raw {
            RawActiveVersion::Number(v) => Ok(Self::Version(v)),
            RawActiveVersion::Label(label) => label.parse(),
        }
    }
}

impl From<ActiveVersion> for RawActiveVersion {
    fn from(active: ActiveVersion) -> Self {
        match active {
            ActiveVersion::Draft => Self::Label(DRAFT_LABEL.to_string()),
            ActiveVersion::Version(v) => Self::Number(v),
        }
    }
}

// ---------------------------------------------------------------------------
// TimelineInput
// ---------------------------------------------------------------------------

/// Everything the timeline is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInput {
    #[serde(default)]
    pub versions: Vec<PackagingVersion>,
    #[serde(default)]
    pub snapshots: Vec<TrafficSnapshot>,
    pub active_version: ActiveVersion,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
