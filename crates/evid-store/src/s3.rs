//! # S3-Compatible IPFS Pinning Backend
//!
//! Uploads through the S3 API of an IPFS pinning service and reads the
//! backend-assigned CID back from object metadata. Retrieval goes through
//! the service's public IPFS gateway with a bounded request timeout, so a
//! dead backend resolves to [`StoreError::Unavailable`] instead of hanging
//! a verification request indefinitely.
//!
//! ## CID Acquisition
//!
//! The pinning backend computes the CID server-side and exposes it as the
//! `cid` entry of the object's metadata. The Rust S3 SDK does not surface
//! raw response headers from PutObject, so [`S3PinStore::put`] always
//! follows the upload with a HeadObject metadata read, retried once after
//! a short delay (the backend assigns the CID asynchronously in rare
//! cases). Callers see a single operation that either succeeds with a CID
//! or fails.

use std::time::Duration;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::Utc;
use evid_core::Cid;
use uuid::Uuid;

use crate::error::StoreError;
use crate::EvidenceStore;

/// Delay before the single HeadObject metadata retry.
const CID_RETRY_DELAY_MS: u64 = 200;

/// Configuration for the S3/IPFS pinning backend.
#[derive(Debug, Clone)]
pub struct S3StoreConfig {
    /// S3 API endpoint of the pinning service (e.g. `https://s3.filebase.com`).
    pub endpoint: String,
    /// Region string the endpoint expects.
    pub region: String,
    /// Bucket configured for IPFS pinning.
    pub bucket: String,
    /// Access key id.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
    /// Public IPFS gateway base URL for retrieval
    /// (e.g. `https://ipfs.filebase.io`).
    pub gateway_base: String,
    /// Request timeout for gateway fetches, in seconds (default: 30).
    pub timeout_secs: u64,
}

impl S3StoreConfig {
    /// Create a configuration with the default timeout.
    pub fn new(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        bucket: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        gateway_base: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            region: region.into(),
            bucket: bucket.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            gateway_base: gateway_base.into(),
            timeout_secs: 30,
        }
    }
}

/// Content-addressable store backed by an S3-compatible IPFS pinning
/// service. `Send + Sync`; share via `Arc` across request handlers.
#[derive(Debug, Clone)]
pub struct S3PinStore {
    s3: S3Client,
    http: reqwest::Client,
    bucket: String,
    gateway_base: String,
}

impl S3PinStore {
    /// Build the S3 and gateway HTTP clients from configuration.
    pub fn new(config: S3StoreConfig) -> Result<Self, StoreError> {
        if config.bucket.trim().is_empty() {
            return Err(StoreError::Unavailable("bucket not configured".into()));
        }

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "evid-store",
        );
        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(config.endpoint.trim_end_matches('/'))
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            s3: S3Client::from_conf(s3_config),
            http,
            bucket: config.bucket,
            gateway_base: config.gateway_base.trim_end_matches('/').to_string(),
        })
    }

    /// Read the backend-assigned CID from object metadata.
    async fn read_cid(&self, key: &str) -> Result<Option<String>, StoreError> {
        let head = self
            .s3
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("HeadObject {key}: {e}")))?;

        Ok(head.metadata().and_then(|m| m.get("cid").cloned()))
    }
}

#[async_trait::async_trait]
impl EvidenceStore for S3PinStore {
    async fn put(&self, bytes: &[u8], content_type: &str) -> Result<Cid, StoreError> {
        // Timestamped keys keep uploads from colliding; the durable name
        // of the content is its CID, not this key.
        let key = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4());

        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("PutObject {key}: {e}")))?;

        let cid = match self.read_cid(&key).await? {
            Some(cid) => cid,
            None => {
                tracing::warn!(key, "CID missing from object metadata, re-querying");
                tokio::time::sleep(Duration::from_millis(CID_RETRY_DELAY_MS)).await;
                self.read_cid(&key).await?.ok_or_else(|| {
                    StoreError::Unavailable(format!(
                        "backend did not assign a CID for object {key}"
                    ))
                })?
            }
        };

        tracing::debug!(key, %cid, size = bytes.len(), "evidence pinned");
        Cid::new(cid).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn get(&self, cid: &Cid) -> Result<Vec<u8>, StoreError> {
        let url = crate::gateway_url(&self.gateway_base, cid);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("gateway fetch {url}: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(cid.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "gateway fetch {url}: HTTP {status}"
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| StoreError::Unavailable(format!("gateway body {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
