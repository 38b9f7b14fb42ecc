//! # SHA-256 Digest Computation
//!
//! Computes content digests over raw evidence bytes. This is the only
//! sanctioned digest path in the workspace: both the ingestion pipeline
//! (digest at upload) and the verification pipeline (recompute from fetched
//! bytes) call [`sha256_hex`], so a digest produced at upload time is
//! byte-for-byte comparable with one recomputed years later.
//!
//! ## Integrity Invariant
//!
//! The digest is a pure function of the input bytes — filename, content
//! type, and timestamps never enter the hash. Identical bytes always
//! produce identical digests, which is what makes whole-pipeline retries
//! idempotent.

use sha2::{Digest, Sha256};

use crate::error::DomainError;

/// Length of a SHA-256 digest rendered as lowercase hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the SHA-256 digest of a byte buffer as a lowercase hex string.
///
/// Operates on the full buffer in memory — size limits are the caller's
/// responsibility (the ingestion pipeline enforces them, not this function).
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Validate a stored digest string (64 lowercase hex chars).
///
/// Used when accepting digests from untrusted sources (database rows,
/// request parameters) before comparing them against recomputed values.
pub fn validate_digest_hex(digest_hex: &str) -> Result<String, DomainError> {
    let d = digest_hex.trim().to_lowercase();
    if d.len() != DIGEST_HEX_LEN {
        return Err(DomainError::InvalidDigest(format!(
            "digest must be {DIGEST_HEX_LEN} hex chars, got {}",
            d.len()
        )));
    }
    if !d.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::InvalidDigest(
            "digest contains non-hex characters".into(),
        ));
    }
    Ok(d)
}
