//! # Evidence Routes
//!
//! The three operations of the integrity surface: multipart upload
//! (reporter or verifier), JSON verification (verifier only), and the
//! gated content-view URL (verifier only). Verification responds 200 with
//! a verdict body even when the verdict is negative — a failed integrity
//! check is an answer, not an error. The only verdict promoted to an HTTP
//! status is `RECORD_NOT_FOUND`, which becomes 404.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use evid_core::{Cid, VerdictReason};
use evid_pipeline::{EvidenceLookup, IngestRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/evidence", post(upload_evidence))
        .route("/v1/evidence/verify", post(verify_evidence))
        .route("/v1/evidence/view", get(view_evidence))
}

// ─── Upload ──────────────────────────────────────────────────────────

/// Response body for a successful upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    /// Evidence record id.
    pub id: Uuid,
    /// Content identifier assigned by the store.
    pub cid: String,
    /// SHA-256 hex digest of the uploaded bytes.
    pub hash: String,
    /// Base64 RSA signature over the digest; absent in unsigned mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Public gateway URL for the pinned content.
    pub ipfs_url: String,
}

/// POST /v1/evidence — upload an evidence file.
///
/// Multipart form: required `file` part (bytes and content type), optional
/// `case_id` part (UUID of the owning case).
#[utoipa::path(
    post,
    path = "/v1/evidence",
    responses(
        (status = 201, description = "Evidence pinned and recorded", body = UploadResponse),
        (status = 400, description = "Missing file part or malformed case_id", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 500, description = "Evidence store unavailable or internal failure", body = crate::error::ErrorBody),
    ),
    tag = "evidence"
)]
pub async fn upload_evidence(
    State(state): State<AppState>,
    Extension(_caller): Extension<CallerIdentity>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut case_ref: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read file part: {e}")))?;
                file = Some((bytes.to_vec(), content_type));
            }
            Some("case_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read case_id: {e}")))?;
                if !text.trim().is_empty() {
                    case_ref = Some(text.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("case_id is not a valid UUID: {text}"))
                    })?);
                }
            }
            _ => {}
        }
    }

    // An empty file part is acceptable: the empty-buffer digest is
    // well-defined, only a missing part is a client error.
    let Some((bytes, content_type)) = file else {
        return Err(AppError::BadRequest("missing file field".to_string()));
    };

    let record = state
        .ingest
        .ingest(IngestRequest {
            bytes,
            content_type,
            case_ref,
        })
        .await?;

    let ipfs_url = evid_store::gateway_url(&state.gateway_base, &record.cid);
    let digest = record.digest.clone().unwrap_or_default();
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            id: record.id,
            cid: record.cid.to_string(),
            hash: digest,
            signature: record.signature,
            ipfs_url,
        }),
    ))
}

// ─── Verify ──────────────────────────────────────────────────────────

/// Request body for verification. At least one identifier is required;
/// `evidence_id` wins when both are present.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct VerifyRequest {
    #[serde(default)]
    pub evidence_id: Option<Uuid>,
    #[serde(default)]
    pub ipfs_cid: Option<String>,
}

/// Response body for verification, negative verdicts included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub verified: bool,
    /// Machine-readable verdict code.
    pub reason: String,
    /// Human-readable elaboration.
    pub details: String,
}

/// POST /v1/evidence/verify — run the integrity verification pipeline.
#[utoipa::path(
    post,
    path = "/v1/evidence/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verdict computed (verified may be false)", body = VerifyResponse),
        (status = 400, description = "No identifier supplied", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not the verifier identity", body = crate::error::ErrorBody),
        (status = 404, description = "No matching evidence record", body = crate::error::ErrorBody),
    ),
    tag = "evidence"
)]
pub async fn verify_evidence(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    caller.require_verifier()?;

    let lookup = match (request.evidence_id, request.ipfs_cid.as_deref()) {
        (Some(id), _) => EvidenceLookup::ById(id),
        (None, Some(cid)) if !cid.trim().is_empty() => EvidenceLookup::ByCid(Cid::new(cid)?),
        _ => {
            return Err(AppError::BadRequest(
                "either evidence_id or ipfs_cid is required".to_string(),
            ))
        }
    };

    let verdict = state.verify.verify(lookup).await?;
    if verdict.reason == VerdictReason::RecordNotFound {
        return Err(AppError::NotFound(verdict.detail));
    }

    Ok(Json(VerifyResponse {
        verified: verdict.verified,
        reason: verdict.reason.as_str().to_string(),
        details: verdict.detail,
    }))
}

// ─── View ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub cid: Option<String>,
}

/// Response carrying the gateway URL for a CID.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ViewResponse {
    pub url: String,
}

/// GET /v1/evidence/view?cid=... — translate a CID into a gateway URL.
///
/// The URL is only handed out after the verifier authorization check;
/// unprivileged callers never learn the retrieval path.
#[utoipa::path(
    get,
    path = "/v1/evidence/view",
    responses(
        (status = 200, description = "Gateway URL for the content", body = ViewResponse),
        (status = 400, description = "Missing or malformed cid parameter", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not the verifier identity", body = crate::error::ErrorBody),
    ),
    tag = "evidence"
)]
pub async fn view_evidence(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(params): Query<ViewParams>,
) -> Result<Json<ViewResponse>, AppError> {
    caller.require_verifier()?;

    let Some(cid) = params.cid.filter(|c| !c.trim().is_empty()) else {
        return Err(AppError::BadRequest("cid query parameter is required".to_string()));
    };
    let cid = Cid::new(cid)?;

    Ok(Json(ViewResponse {
        url: evid_store::gateway_url(&state.gateway_base, &cid),
    }))
}
