//! Packaging version timeline engine.
//!
//! Derives the version-switcher timeline shown next to a video's traffic
//! analytics: one row per span during which a packaging version (title,
//! description, tags, thumbnail) was live.
//!
//! - [`timeline`] -- builds rows from version records and traffic snapshots,
//!   including versions whose record was deleted.
//! - [`coalesce`] -- merges spurious splits of a version's activation windows.
//! - [`decorate`] -- pins the live row, orders the rest newest first, and
//!   marks versions that were active more than once.
//! - [`lookup`] and [`display`] -- drill-down helpers for the rendering layer.
//! - [`cache`] -- caller-owned memoization keyed on an input fingerprint.

pub mod cache;
pub mod coalesce;
pub mod config;
pub mod decorate;
pub mod diagnostics;
pub mod display;
pub mod error;
pub mod hashing;
pub mod lookup;
pub mod packaging;
pub mod timeline;
pub mod types;

pub use cache::TimelineCache;
pub use config::TimelineConfig;
pub use display::{format_snapshot_date, SnapshotDate};
pub use error::CoreError;
pub use lookup::{get_version_snapshot, get_virtual_version_snapshots};
pub use packaging::{
    ActivePeriod, ActiveVersion, PackagingSnapshotMeta, PackagingVersion, TimelineInput,
    TrafficSnapshot,
};
pub use timeline::{
    build_timeline, build_timeline_for, build_timeline_with_issues, TimelineBuild, VirtualPeriod,
};
