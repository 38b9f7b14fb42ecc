//! # Verification Verdicts
//!
//! The outcome of an integrity check. A verdict is computed per request and
//! never persisted — re-verification always replays the full pipeline
//! against the live store.
//!
//! ## Invariant
//!
//! `verified == true` if and only if the reason is
//! [`VerdictReason::IntegrityOk`], which requires: record found, content
//! fetched, recomputed digest equal to the stored digest, and a signature
//! that validates against the system public key. Every constructor in this
//! module maintains that pairing — there is no way to build a "verified"
//! verdict with a failure reason.

use serde::{Deserialize, Serialize};

/// Why a verification request resolved the way it did.
///
/// The distinction between [`HashMismatch`](VerdictReason::HashMismatch) and
/// [`SignatureInvalid`](VerdictReason::SignatureInvalid) matters to callers:
/// the first says "content changed", the second says "authenticity
/// unconfirmed", and they have different remediation paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictReason {
    /// All checks passed.
    IntegrityOk,
    /// Recomputed digest differs from the stored digest — tampering detected.
    HashMismatch,
    /// Digests match but the signature does not validate against the
    /// system public key.
    SignatureInvalid,
    /// The record predates integrity tracking and carries no digest.
    LegacyUnsigned,
    /// No evidence record matched the requested id or CID.
    RecordNotFound,
    /// The blob store could not be reached or returned a failure.
    StoreUnreachable,
}

impl VerdictReason {
    /// Machine-readable reason code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntegrityOk => "INTEGRITY_OK",
            Self::HashMismatch => "HASH_MISMATCH",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::LegacyUnsigned => "LEGACY_UNSIGNED",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::StoreUnreachable => "STORE_UNREACHABLE",
        }
    }
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of one verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationVerdict {
    /// True only for [`VerdictReason::IntegrityOk`].
    pub verified: bool,
    /// Why the check resolved this way.
    pub reason: VerdictReason,
    /// Human-readable elaboration shown to the verifier.
    pub detail: String,
}

impl VerificationVerdict {
    /// Build the single passing verdict.
    pub fn ok(detail: impl Into<String>) -> Self {
        Self {
            verified: true,
            reason: VerdictReason::IntegrityOk,
            detail: detail.into(),
        }
    }

    /// Build a failing verdict for the given reason.
    ///
    /// `reason` must not be `IntegrityOk` — that would break the
    /// verified/reason pairing. Debug builds assert it.
    pub fn failed(reason: VerdictReason, detail: impl Into<String>) -> Self {
        debug_assert!(reason != VerdictReason::IntegrityOk);
        Self {
            verified: false,
            reason,
            detail: detail.into(),
        }
    }
}
