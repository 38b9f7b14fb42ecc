//! # Environment Configuration
//!
//! All runtime configuration is env-driven and read once at startup.
//! Optional pieces degrade explicitly: no signing key means unsigned
//! ingestion, no verification key means every signature check fails, no
//! S3 configuration means the in-memory store, no `DATABASE_URL` means
//! the in-memory repository. Each degradation is logged at startup.
//!
//! PEM keys may be provided inline (`EVID_SIGNING_KEY_PEM`, possibly with
//! escaped newlines) or as a file path (`EVID_SIGNING_KEY_FILE`); inline
//! wins when both are set.

use std::env;

use evid_store::S3StoreConfig;

use crate::auth::AuthConfig;

/// Default public IPFS gateway when none is configured.
const DEFAULT_GATEWAY: &str = "https://ipfs.filebase.io";

#[derive(Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub auth: AuthConfig,
    /// Private signing key PEM; absent means unsigned ingestion.
    pub signing_key_pem: Option<String>,
    /// Public verification key PEM; absent means verification can
    /// never resolve to `INTEGRITY_OK`.
    pub verifying_key_pem: Option<String>,
    /// S3 pinning backend; absent means the in-memory store.
    pub store: Option<S3StoreConfig>,
    pub gateway_base: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, std::io::Error> {
        let gateway_base =
            env::var("EVID_IPFS_GATEWAY").unwrap_or_else(|_| DEFAULT_GATEWAY.to_string());

        Ok(Self {
            port: env::var("EVID_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            auth: AuthConfig {
                reporter_token: non_empty(env::var("EVID_REPORTER_TOKEN").ok()),
                verifier_token: non_empty(env::var("EVID_VERIFIER_TOKEN").ok()),
            },
            signing_key_pem: pem_from_env("EVID_SIGNING_KEY_PEM", "EVID_SIGNING_KEY_FILE")?,
            verifying_key_pem: pem_from_env("EVID_VERIFYING_KEY_PEM", "EVID_VERIFYING_KEY_FILE")?,
            store: s3_from_env(&gateway_base),
            gateway_base,
        })
    }
}

/// Treat empty or whitespace-only env values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Load a PEM from an inline env var, falling back to a file path var.
fn pem_from_env(inline_var: &str, file_var: &str) -> Result<Option<String>, std::io::Error> {
    if let Some(pem) = non_empty(env::var(inline_var).ok()) {
        return Ok(Some(pem));
    }
    match non_empty(env::var(file_var).ok()) {
        Some(path) => std::fs::read_to_string(&path).map(Some),
        None => Ok(None),
    }
}

/// Build the S3 pinning configuration when the endpoint and bucket are
/// both present; partial configuration is treated as absent.
fn s3_from_env(gateway_base: &str) -> Option<S3StoreConfig> {
    let endpoint = non_empty(env::var("EVID_S3_ENDPOINT").ok())?;
    let bucket = non_empty(env::var("EVID_S3_BUCKET").ok())?;
    let region = env::var("EVID_S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
    let access_key = env::var("EVID_S3_ACCESS_KEY").unwrap_or_default();
    let secret_key = env::var("EVID_S3_SECRET_KEY").unwrap_or_default();

    Some(S3StoreConfig::new(
        endpoint,
        region,
        bucket,
        access_key,
        secret_key,
        gateway_base,
    ))
}
