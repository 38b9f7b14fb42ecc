//! # In-Memory Store Backend
//!
//! DashMap-backed [`EvidenceStore`] for development and tests. The CID is
//! derived deterministically from content, so identical bytes yield
//! identical CIDs — the same idempotence property the real pinning
//! backend provides.
//!
//! Failure injection hooks ([`MemoryStore::set_offline`],
//! [`MemoryStore::corrupt`]) let the verification pipeline's
//! `STORE_UNREACHABLE` and `HASH_MISMATCH` paths be exercised without a
//! network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use evid_core::{sha256_hex, Cid};

use crate::error::StoreError;
use crate::EvidenceStore;

/// Shared in-memory blob store. Cheaply cloneable — all clones share the
/// same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    blobs: DashMap<String, Vec<u8>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the CID this store would assign for the given bytes.
    pub fn cid_for(bytes: &[u8]) -> Cid {
        // Content-derived, like the real backend; prefixed so it can never
        // be mistaken for a digest.
        Cid::new(format!("memipfs-{}", sha256_hex(bytes))).expect("derived CID is non-empty")
    }

    /// Simulate the backend going unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Replace the stored bytes for a CID without changing the CID —
    /// simulates a tampering or lying storage backend.
    pub fn corrupt(&self, cid: &Cid, bytes: Vec<u8>) {
        self.inner.blobs.insert(cid.as_str().to_string(), bytes);
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.inner.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.inner.blobs.is_empty()
    }
}

#[async_trait::async_trait]
impl EvidenceStore for MemoryStore {
    async fn put(&self, bytes: &[u8], _content_type: &str) -> Result<Cid, StoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        let cid = Self::cid_for(bytes);
        // Content-addressed: identical CID means identical content, so a
        // re-insert of the same bytes is a no-op either way.
        self.inner
            .blobs
            .entry(cid.as_str().to_string())
            .or_insert_with(|| bytes.to_vec());
        Ok(cid)
    }

    async fn get(&self, cid: &Cid) -> Result<Vec<u8>, StoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        self.inner
            .blobs
            .get(cid.as_str())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(cid.to_string()))
    }
}
