//! # Evidence Records
//!
//! The persisted shape of an item of uploaded evidence: the content
//! identifier assigned by the blob store, the SHA-256 digest of the exact
//! uploaded bytes, and the RSA signature over that digest.
//!
//! ## Lifecycle Invariant
//!
//! Records are created exactly once at ingestion completion and never
//! mutated. `digest` is always present on newly ingested records; it is
//! optional only to represent legacy rows that predate integrity tracking.
//! `signature` may be legitimately absent when no signing key was
//! configured at upload time — that is an expected operating mode, distinct
//! from a signature that fails verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A content identifier assigned by the content-addressable store.
///
/// The CID is a property of the backend — a deterministic function of the
/// uploaded bytes — and is read back from the backend's response, never
/// computed locally. Wrapped in a newtype so it cannot be confused with a
/// digest or a record id at a call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    /// Create a CID from a backend-assigned identifier string.
    ///
    /// Rejects empty or whitespace-only values — a blank CID would make the
    /// record permanently unverifiable.
    pub fn new(s: impl Into<String>) -> Result<Self, DomainError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidCid(
                "content identifier must not be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the CID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted evidence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Unique record id, generated at persistence time.
    pub id: Uuid,
    /// The owning case, when one exists. Evidence may legitimately be
    /// uploaded before its case record is created, so this is a true
    /// optional reference — there is no placeholder sentinel.
    pub case_ref: Option<Uuid>,
    /// Content identifier assigned by the store.
    pub cid: Cid,
    /// Hex SHA-256 of the exact uploaded bytes. `None` only on legacy rows
    /// that predate integrity tracking.
    pub digest: Option<String>,
    /// Base64 RSA signature over `digest`. `None` when signing was skipped
    /// because no private key was configured.
    pub signature: Option<String>,
    /// Declared MIME type. Informational only — never enters the digest.
    pub content_type: String,
    /// Persistence timestamp.
    pub created_at: DateTime<Utc>,
}

impl EvidenceRecord {
    /// Whether this record predates integrity tracking (no stored digest).
    pub fn is_legacy(&self) -> bool {
        self.digest.is_none()
    }
}

/// The fields of a record about to be persisted, before an id and
/// timestamp are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewEvidence {
    pub case_ref: Option<Uuid>,
    pub cid: Cid,
    pub digest: String,
    pub signature: Option<String>,
    pub content_type: String,
}
