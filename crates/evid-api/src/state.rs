//! # Application State
//!
//! Everything shared across request handlers: the two pipelines, the
//! gateway base URL for the gated view endpoint, the auth configuration,
//! and the optional Postgres pool (used only by the readiness probe; the
//! repository owns its own pool handle).

use std::sync::Arc;

use evid_crypto::{SignatureVerifier, Signer};
use evid_pipeline::{EvidenceRepository, IngestionPipeline, VerificationPipeline};
use evid_store::EvidenceStore;
use sqlx::PgPool;

use crate::auth::AuthConfig;

#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestionPipeline,
    pub verify: VerificationPipeline,
    /// Public IPFS gateway base for view URLs.
    pub gateway_base: String,
    pub auth: AuthConfig,
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Wire both pipelines over shared store and repository adapters.
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        repo: Arc<dyn EvidenceRepository>,
        signer: Signer,
        verifier: SignatureVerifier,
        gateway_base: impl Into<String>,
        auth: AuthConfig,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            ingest: IngestionPipeline::new(store.clone(), repo.clone(), signer),
            verify: VerificationPipeline::new(store, repo, verifier),
            gateway_base: gateway_base.into(),
            auth,
            db_pool,
        }
    }
}
