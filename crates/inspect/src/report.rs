//! Timeline report assembly.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use packaging_core::diagnostics::HistoryIssue;
use packaging_core::hashing::fingerprint;
use packaging_core::lookup::latest_snapshot_for_period;
use packaging_core::{
    build_timeline_with_issues, format_snapshot_date, SnapshotDate, TimelineConfig,
    TimelineInput, VirtualPeriod,
};

/// One timeline row plus the capture time of its latest snapshot, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(flatten)]
    pub period: VirtualPeriod,
    pub latest_snapshot: Option<SnapshotDate>,
}

/// Everything printed for one input document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineReport {
    pub fingerprint: String,
    pub sorted_versions: Vec<ReportRow>,
    pub issues: Vec<HistoryIssue>,
}

impl TimelineReport {
    pub fn build(input: &TimelineInput, config: &TimelineConfig) -> anyhow::Result<Self> {
        let fingerprint = fingerprint(input, config).context("Failed to fingerprint input")?;
        let built = build_timeline_with_issues(
            &input.versions,
            &input.snapshots,
            input.active_version,
            config,
        );

        let sorted_versions = built
            .rows
            .into_iter()
            .map(|period| {
                let latest_snapshot = latest_snapshot_for_period(&period, &input.snapshots, config)
                    .map(|s| format_snapshot_date(s.timestamp, config));
                ReportRow {
                    period,
                    latest_snapshot,
                }
            })
            .collect();

        Ok(Self {
            fingerprint,
            sorted_versions,
            issues: built.issues,
        })
    }
}

/// Parse an input document from JSON text.
pub fn parse_document(text: &str) -> anyhow::Result<TimelineInput> {
    serde_json::from_str(text).context("Input is not a valid timeline document")
}

/// Read and parse an input document from disk.
pub fn load_document(path: &Path) -> anyhow::Result<TimelineInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_document(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
