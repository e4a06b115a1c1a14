//! Input fingerprints for timeline memoization.

use sha2::{Digest, Sha256};

use crate::config::TimelineConfig;
use crate::error::CoreError;
use crate::packaging::TimelineInput;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Digest of everything a timeline build depends on.
///
/// Equal inputs always produce equal fingerprints; JSON object keys inside
/// configuration payloads serialize in sorted order.
pub fn fingerprint(input: &TimelineInput, config: &TimelineConfig) -> Result<String, CoreError> {
    let bytes = serde_json::to_vec(&(input, config))
        .map_err(|e| CoreError::Internal(format!("Failed to serialize timeline input: {e}")))?;
    Ok(sha256_hex(&bytes))
}
