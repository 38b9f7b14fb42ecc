//! Evidence Integrity API server binary.
//!
//! Reads all configuration from the environment, wires the store,
//! repository, and key material into the pipelines, and serves the Axum
//! router. Missing optional configuration degrades with a logged warning
//! instead of refusing to start; see [`evid_api::config`].

use std::net::SocketAddr;
use std::sync::Arc;

use evid_api::config::ApiConfig;
use evid_api::state::AppState;
use evid_api::{app, db};
use evid_crypto::{RsaSigningKey, RsaVerifyingKey, SignatureVerifier, Signer};
use evid_pipeline::{EvidenceRepository, MemoryRepository};
use evid_store::{EvidenceStore, MemoryStore, S3PinStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env()?;

    let signer = match &config.signing_key_pem {
        Some(pem) => Signer::new(RsaSigningKey::from_pem(pem)?),
        None => {
            tracing::warn!("no signing key configured — evidence will be ingested unsigned");
            Signer::unsigned()
        }
    };
    let verifier = match &config.verifying_key_pem {
        Some(pem) => SignatureVerifier::new(RsaVerifyingKey::from_pem(pem)?),
        None => {
            tracing::warn!(
                "no verification key configured — no evidence can verify as INTEGRITY_OK"
            );
            SignatureVerifier::unconfigured()
        }
    };

    let store: Arc<dyn EvidenceStore> = match config.store.clone() {
        Some(s3) => Arc::new(S3PinStore::new(s3)?),
        None => {
            tracing::warn!(
                "no S3 pinning backend configured — using the in-memory store. \
                 Evidence content will not survive restarts."
            );
            Arc::new(MemoryStore::new())
        }
    };

    let pool = db::init_pool().await?;
    let repo: Arc<dyn EvidenceRepository> = match &pool {
        Some(pool) => Arc::new(db::PgEvidenceRepository::new(pool.clone())),
        None => Arc::new(MemoryRepository::new()),
    };

    let state = AppState::new(
        store,
        repo,
        signer,
        verifier,
        config.gateway_base.clone(),
        config.auth.clone(),
        pool,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("evid-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state).into_make_service()).await?;
    Ok(())
}
