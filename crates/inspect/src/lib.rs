//! `packaging-inspect` library crate.
//!
//! Loads a `{versions, snapshots, activeVersion}` document exported from the
//! data layer and renders the derived timeline as a JSON report. The binary
//! entrypoint lives in `main.rs`.

pub mod report;

pub use report::{load_document, parse_document, TimelineReport};
