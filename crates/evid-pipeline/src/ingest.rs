//! # Ingestion Pipeline
//!
//! Receive buffer → digest → sign → store → persist record. Each step is a
//! potential abort point with a strict no-partial-state rule on the way in:
//! a store failure aborts before anything is persisted. The one asymmetry
//! is persistence failure *after* a successful upload — the blob is already
//! pinned, but content-addressed blobs are inert, so the orphan is logged
//! and left in place rather than rolled back.
//!
//! Retrying a failed ingestion end-to-end is safe: identical bytes produce
//! the same digest and the same CID, so the pipeline is idempotent by
//! construction.

use std::sync::Arc;

use evid_core::{sha256_hex, EvidenceRecord, NewEvidence};
use evid_crypto::{CryptoError, Signer, SigningOutcome};
use evid_store::{EvidenceStore, StoreError};
use thiserror::Error;
use uuid::Uuid;

use crate::repository::{EvidenceRepository, RepositoryError};

/// Errors that abort an ingestion.
///
/// An unsigned outcome is *not* here — signing without a configured key
/// degrades to an unsigned record, it does not fail the pipeline.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Upload failed; nothing was persisted.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Signing failed with a key configured (a real RSA error, not the
    /// expected no-key mode).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The record could not be persisted. The content is already pinned
    /// as an orphaned blob.
    #[error("record persistence failed: {0}")]
    Repository(String),
}

/// One evidence upload.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// The exact bytes to pin. The digest covers these and nothing else.
    pub bytes: Vec<u8>,
    /// Declared MIME type, informational only.
    pub content_type: String,
    /// Owning case, when it already exists.
    pub case_ref: Option<Uuid>,
}

/// Orchestrates evidence ingestion. Stateless between calls; share via
/// `Arc` across concurrent requests.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn EvidenceStore>,
    repo: Arc<dyn EvidenceRepository>,
    signer: Signer,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        repo: Arc<dyn EvidenceRepository>,
        signer: Signer,
    ) -> Self {
        Self {
            store,
            repo,
            signer,
        }
    }

    /// Run the full pipeline, returning the persisted record.
    pub async fn ingest(&self, request: IngestRequest) -> Result<EvidenceRecord, IngestError> {
        // 1. Digest — pure, cannot fail.
        let digest = sha256_hex(&request.bytes);

        // 2. Sign. No key configured is an expected mode, not an abort.
        let signature = match self.signer.sign(&digest)? {
            SigningOutcome::Signed(sig) => Some(sig),
            SigningOutcome::Unsigned => {
                tracing::warn!(%digest, "no signing key configured, persisting unsigned record");
                None
            }
        };

        // 3. Upload. Failure here aborts with no partial state.
        let cid = self
            .store
            .put(&request.bytes, &request.content_type)
            .await?;

        // 4. Persist. The blob is already pinned; a failure here orphans
        //    it, which is logged and tolerated (content-addressed blobs
        //    are inert and a retry will reuse the same CID).
        let record = self
            .repo
            .create(NewEvidence {
                case_ref: request.case_ref,
                cid: cid.clone(),
                digest: digest.clone(),
                signature,
                content_type: request.content_type,
            })
            .await
            .map_err(|RepositoryError::Backend(e)| {
                tracing::error!(%cid, error = %e, "record persistence failed, blob orphaned");
                IngestError::Repository(e)
            })?;

        tracing::info!(id = %record.id, %cid, %digest, "evidence ingested");
        Ok(record)
    }
}
