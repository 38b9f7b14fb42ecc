//! # evid-store — Content-Addressable Store Adapter
//!
//! Uploads evidence bytes to a content-addressable blob store and fetches
//! them back by content identifier. Decoupling storage from the hashing and
//! signing logic lets the backend be swapped without touching integrity
//! code — and means the verifier never trusts the store's own claims about
//! content: it always re-derives the digest from the fetched bytes.
//!
//! ## Backends
//!
//! - [`S3PinStore`] — an S3-compatible IPFS pinning service (e.g. Filebase).
//!   Upload goes through the S3 API; the backend-assigned CID is read back
//!   from object metadata. Retrieval goes through the public IPFS gateway
//!   with a bounded timeout.
//! - [`MemoryStore`] — DashMap-backed, for development and tests. Supports
//!   failure injection (offline mode, content corruption) so verification
//!   failure paths can be exercised deterministically.

pub mod error;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use evid_core::Cid;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use s3::{S3PinStore, S3StoreConfig};

/// A content-addressable blob store.
///
/// Both operations are single-attempt from the caller's perspective; any
/// internal retry (such as the CID metadata re-query in [`S3PinStore`])
/// is folded into the method. Implementations must be safe to share via
/// `Arc` across concurrent requests.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Upload a byte buffer, returning the backend-assigned CID.
    ///
    /// Fails with [`StoreError::Unavailable`] when the backend is
    /// unreachable or misconfigured — fatal to ingestion.
    async fn put(&self, bytes: &[u8], content_type: &str) -> Result<Cid, StoreError>;

    /// Fetch a buffer by CID over the store's retrieval path.
    async fn get(&self, cid: &Cid) -> Result<Vec<u8>, StoreError>;
}

/// Build the public gateway URL for a CID.
///
/// Centralized here so the storage URL pattern appears in exactly one
/// place — the HTTP layer hands these out only after authorization.
pub fn gateway_url(gateway_base: &str, cid: &Cid) -> String {
    format!("{}/ipfs/{}", gateway_base.trim_end_matches('/'), cid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_url_joins_cleanly() {
        let cid = Cid::new("bafyabc").unwrap();
        assert_eq!(
            gateway_url("https://ipfs.example.io", &cid),
            "https://ipfs.example.io/ipfs/bafyabc"
        );
        // Trailing slash on the base must not double up.
        assert_eq!(
            gateway_url("https://ipfs.example.io/", &cid),
            "https://ipfs.example.io/ipfs/bafyabc"
        );
    }
}
