//! `packaging-inspect` -- offline packaging timeline inspector.
//!
//! Reads a timeline document and prints the derived rows, their latest
//! snapshot and any history inconsistencies as JSON on stdout.
//!
//! # Usage
//!
//! ```text
//! packaging-inspect <document.json>
//! ```
//!
//! # Environment variables
//!
//! | Variable                          | Default | Description                      |
//! |-----------------------------------|---------|----------------------------------|
//! | `TIMELINE_SNAPSHOT_TOLERANCE_MS`  | `5000`  | Snapshot matching slack          |
//! | `TIMELINE_OVERLAP_THRESHOLD_MS`   | `1000`  | Gap overlap that splits periods  |
//! | `TIMELINE_DISPLAY_OFFSET_MINUTES` | `0`     | UTC offset for rendered dates    |

use std::path::PathBuf;

use anyhow::Context;
use packaging_core::TimelineConfig;
use packaging_inspect::{load_document, TimelineReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "packaging_inspect=info,packaging_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: packaging-inspect <document.json>")?;

    let config = TimelineConfig::from_env().context("Invalid timeline configuration")?;
    let input = load_document(&path)?;

    tracing::info!(
        path = %path.display(),
        versions = input.versions.len(),
        snapshots = input.snapshots.len(),
        active_version = %input.active_version,
        "Loaded timeline document",
    );

    let report = TimelineReport::build(&input, &config)?;
    if !report.issues.is_empty() {
        tracing::warn!(count = report.issues.len(), "History has inconsistencies");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
