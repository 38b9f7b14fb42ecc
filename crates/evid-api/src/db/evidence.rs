//! Evidence record persistence.
//!
//! Postgres-backed [`EvidenceRepository`] over the `evidence` table.
//! `sha256_hash` and `rsa_signature` are nullable: rows written before
//! cryptographic tracking was enabled carry neither, and the verification
//! pipeline reports them as `LEGACY_UNSIGNED`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use evid_core::{Cid, EvidenceRecord, NewEvidence};
use evid_pipeline::{EvidenceRepository, RepositoryError};
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "id, case_id, ipfs_cid, sha256_hash, rsa_signature, file_type, created_at";

/// SQLx-backed repository.
#[derive(Clone)]
pub struct PgEvidenceRepository {
    pool: PgPool,
}

impl PgEvidenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvidenceRepository for PgEvidenceRepository {
    async fn create(&self, new: NewEvidence) -> Result<EvidenceRecord, RepositoryError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO evidence (id, case_id, ipfs_cid, sha256_hash, rsa_signature,
             file_type, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(new.case_ref)
        .bind(new.cid.as_str())
        .bind(&new.digest)
        .bind(&new.signature)
        .bind(&new.content_type)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(EvidenceRecord {
            id,
            case_ref: new.case_ref,
            cid: new.cid,
            digest: Some(new.digest),
            signature: new.signature,
            content_type: new.content_type,
            created_at,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EvidenceRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, EvidenceRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM evidence WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.and_then(EvidenceRow::into_record))
    }

    async fn find_by_cid(&self, cid: &Cid) -> Result<Option<EvidenceRecord>, RepositoryError> {
        // Identical content shares a CID; the earliest row is the canonical
        // record for that content.
        let row = sqlx::query_as::<_, EvidenceRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM evidence WHERE ipfs_cid = $1
             ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(cid.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.and_then(EvidenceRow::into_record))
    }
}

fn backend(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Backend(e.to_string())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct EvidenceRow {
    id: Uuid,
    case_id: Option<Uuid>,
    ipfs_cid: String,
    sha256_hash: Option<String>,
    rsa_signature: Option<String>,
    file_type: String,
    created_at: DateTime<Utc>,
}

impl EvidenceRow {
    fn into_record(self) -> Option<EvidenceRecord> {
        let cid = match Cid::new(&self.ipfs_cid) {
            Ok(cid) => cid,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    ipfs_cid = %self.ipfs_cid,
                    "skipping evidence row with invalid CID"
                );
                return None;
            }
        };
        Some(EvidenceRecord {
            id: self.id,
            case_ref: self.case_id,
            cid,
            digest: self.sha256_hash,
            signature: self.rsa_signature,
            content_type: self.file_type,
            created_at: self.created_at,
        })
    }
}
