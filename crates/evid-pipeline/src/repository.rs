//! # Evidence Record Repository
//!
//! Persistence seam for evidence records. Lookup is supported by record id
//! *and* by CID, because callers may hold only one of the two (a UI element
//! typically carries the CID; an internal reference carries the id).
//! Absence is `None`, never an error — the verification pipeline turns it
//! into a `RECORD_NOT_FOUND` verdict.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use evid_core::{Cid, EvidenceRecord, NewEvidence};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the repository backend itself (connection loss, constraint
/// violations). Distinct from "no matching record", which is `Ok(None)`.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("repository backend error: {0}")]
    Backend(String),
}

/// Stores and retrieves evidence records.
#[async_trait]
pub trait EvidenceRepository: Send + Sync {
    /// Persist a new record, assigning its id and timestamp.
    async fn create(&self, new: NewEvidence) -> Result<EvidenceRecord, RepositoryError>;

    /// Look up by record id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EvidenceRecord>, RepositoryError>;

    /// Look up by content identifier.
    async fn find_by_cid(&self, cid: &Cid) -> Result<Option<EvidenceRecord>, RepositoryError>;
}

/// DashMap-backed repository for development and tests. Cheaply cloneable;
/// all clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    records: Arc<DashMap<Uuid, EvidenceRecord>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built record verbatim.
    ///
    /// Test seam for seeding legacy rows (no digest) and records with
    /// doctored fields that `create` would never produce.
    pub fn insert_raw(&self, record: EvidenceRecord) {
        self.records.insert(record.id, record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the repository holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl EvidenceRepository for MemoryRepository {
    async fn create(&self, new: NewEvidence) -> Result<EvidenceRecord, RepositoryError> {
        let record = EvidenceRecord {
            id: Uuid::new_v4(),
            case_ref: new.case_ref,
            cid: new.cid,
            digest: Some(new.digest),
            signature: new.signature,
            content_type: new.content_type,
            created_at: Utc::now(),
        };
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EvidenceRecord>, RepositoryError> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_cid(&self, cid: &Cid) -> Result<Option<EvidenceRecord>, RepositoryError> {
        // Duplicate uploads share a CID; the earliest record is canonical,
        // same ordering as the Postgres backend.
        Ok(self
            .records
            .iter()
            .filter(|r| r.value().cid == *cid)
            .min_by_key(|r| r.value().created_at)
            .map(|r| r.value().clone()))
    }
}
