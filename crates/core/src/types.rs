/// All timestamps are milliseconds since the Unix epoch, UTC.
pub type EpochMillis = i64;

/// Packaging version numbers are positive and assigned monotonically per video.
pub type VersionNumber = u32;
