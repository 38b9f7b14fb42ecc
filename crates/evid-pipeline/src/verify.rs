//! # Verification Pipeline
//!
//! Record lookup → legacy short-circuit → store fetch → digest recompute →
//! digest comparison → signature check → verdict. The ordering is load-
//! bearing: the digest comparison runs *before* signature verification so
//! that tampered content is always reported as `HASH_MISMATCH`, never
//! misreported as a signature problem — the two verdicts carry different
//! remediation implications ("content changed" vs "authenticity
//! unconfirmed").
//!
//! The pipeline never trusts the store: the digest is always re-derived
//! from the fetched bytes, so a compromised or lying backend is caught by
//! the comparison. Nothing here mutates stored data.

use std::sync::Arc;

use evid_core::{sha256_hex, validate_digest_hex, Cid, EvidenceRecord, VerdictReason,
    VerificationVerdict};
use evid_crypto::SignatureVerifier;
use evid_store::{EvidenceStore, StoreError};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::repository::{EvidenceRepository, RepositoryError};

/// How the caller identifies the record to verify.
#[derive(Debug, Clone)]
pub enum EvidenceLookup {
    ById(Uuid),
    ByCid(Cid),
}

impl std::fmt::Display for EvidenceLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ById(id) => write!(f, "id {id}"),
            Self::ByCid(cid) => write!(f, "CID {cid}"),
        }
    }
}

/// Orchestrates integrity verification. Stateless between calls; share
/// via `Arc` across concurrent requests.
#[derive(Clone)]
pub struct VerificationPipeline {
    store: Arc<dyn EvidenceStore>,
    repo: Arc<dyn EvidenceRepository>,
    verifier: SignatureVerifier,
}

impl VerificationPipeline {
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        repo: Arc<dyn EvidenceRepository>,
        verifier: SignatureVerifier,
    ) -> Self {
        Self {
            store,
            repo,
            verifier,
        }
    }

    /// Run the full verification, producing a verdict.
    ///
    /// Integrity failures are verdicts, not errors — the only `Err` here
    /// is a repository backend failure (the lookup itself could not run).
    pub async fn verify(
        &self,
        lookup: EvidenceLookup,
    ) -> Result<VerificationVerdict, RepositoryError> {
        // 1. Resolve the record.
        let record = match &lookup {
            EvidenceLookup::ById(id) => self.repo.find_by_id(*id).await?,
            EvidenceLookup::ByCid(cid) => self.repo.find_by_cid(cid).await?,
        };
        let Some(record) = record else {
            return Ok(VerificationVerdict::failed(
                VerdictReason::RecordNotFound,
                format!("no evidence record matches {lookup}"),
            ));
        };

        Ok(self.verify_record(&record).await)
    }

    /// Verify a resolved record against the live store.
    async fn verify_record(&self, record: &EvidenceRecord) -> VerificationVerdict {
        // 2. Legacy short-circuit — no digest means there is nothing to
        //    compare against; skip the store fetch entirely.
        let Some(stored_digest) = record.digest.as_deref() else {
            return VerificationVerdict::failed(
                VerdictReason::LegacyUnsigned,
                "this evidence was uploaded before cryptographic tracking \
                 was enabled and cannot be verified",
            );
        };

        // 3. Fetch the content by CID.
        let bytes = match self.store.get(&record.cid).await {
            Ok(bytes) => bytes,
            Err(e @ (StoreError::Unavailable(_) | StoreError::NotFound(_))) => {
                tracing::warn!(id = %record.id, cid = %record.cid, error = %e,
                    "store fetch failed during verification");
                return VerificationVerdict::failed(
                    VerdictReason::StoreUnreachable,
                    "the evidence content could not be fetched from the store",
                );
            }
        };

        // 4–5. Recompute and compare. Digest comparison precedes signature
        //      verification (see module docs).
        let recomputed = sha256_hex(&bytes);
        if !digest_matches(stored_digest, &recomputed) {
            tracing::warn!(id = %record.id, cid = %record.cid,
                stored = stored_digest, recomputed = %recomputed,
                "digest mismatch — content altered");
            return VerificationVerdict::failed(
                VerdictReason::HashMismatch,
                "the content of the file has been altered or corrupted since upload",
            );
        }

        // 6. Signature over the recomputed digest. An absent signature on
        //    a digested record fails here the same way a forged one does.
        let signature = record.signature.as_deref().unwrap_or_default();
        if !self.verifier.verify(&recomputed, signature) {
            return VerificationVerdict::failed(
                VerdictReason::SignatureInvalid,
                "the cryptographic signature does not match the system public key; \
                 the producer of this evidence could not be verified",
            );
        }

        // 7. All checks passed.
        VerificationVerdict::ok("evidence integrity and authenticity verified via RSA-SHA256")
    }
}

/// Constant-time comparison of the stored digest against the recomputed
/// one. A stored value that fails hex validation can never match.
fn digest_matches(stored: &str, recomputed: &str) -> bool {
    let Ok(stored) = validate_digest_hex(stored) else {
        return false;
    };
    bool::from(stored.as_bytes().ct_eq(recomputed.as_bytes()))
}
