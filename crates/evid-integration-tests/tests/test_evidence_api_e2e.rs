//! # End-to-End Evidence Lifecycle over HTTP
//!
//! Exercises the full Axum application through `tower::ServiceExt::oneshot`:
//! upload, verification in every verdict, and the gated view endpoint.
//! Auth is disabled in this suite (no tokens configured) so every request
//! runs with the verifier role; the auth-enabled paths are covered in
//! `test_auth_http.rs`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use evid_api::auth::AuthConfig;
use evid_api::state::AppState;
use evid_core::{Cid, EvidenceRecord};
use evid_crypto::{RsaSigningKey, SignatureVerifier, Signer};
use evid_pipeline::{EvidenceRepository, MemoryRepository};
use evid_store::MemoryStore;

const HELLO_DIGEST: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
const GATEWAY: &str = "https://ipfs.test.example";
const BOUNDARY: &str = "evid-test-boundary";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct TestRig {
    app: axum::Router,
    store: MemoryStore,
    repo: MemoryRepository,
}

/// Build the full application over in-memory backends with a fresh RSA
/// key pair and auth disabled.
fn test_rig() -> TestRig {
    let (signing, verifying) = RsaSigningKey::generate().unwrap();
    let store = MemoryStore::new();
    let repo = MemoryRepository::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(repo.clone()),
        Signer::new(signing),
        SignatureVerifier::new(verifying),
        GATEWAY,
        AuthConfig::disabled(),
        None,
    );
    TestRig {
        app: evid_api::app(state),
        store,
        repo,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a multipart upload request with a `file` part and an optional
/// `case_id` part.
fn upload_request(file_bytes: &[u8], case_id: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"evidence.txt\"\r\nContent-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
    if let Some(case) = case_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"case_id\"\r\n\r\n{case}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/v1/evidence")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn verify_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/evidence/verify")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Upload a file and return the parsed 201 response body.
async fn upload(rig: &TestRig, bytes: &[u8]) -> serde_json::Value {
    let resp = rig
        .app
        .clone()
        .oneshot(upload_request(bytes, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_returns_record_with_known_digest() {
    let rig = test_rig();
    let uploaded = upload(&rig, b"hello world").await;

    assert_eq!(uploaded["success"], true);
    assert_eq!(uploaded["hash"], HELLO_DIGEST);
    assert!(uploaded["id"].as_str().unwrap().parse::<Uuid>().is_ok());
    let cid = uploaded["cid"].as_str().unwrap();
    assert!(!cid.is_empty());
    assert_eq!(
        uploaded["ipfs_url"],
        format!("{GATEWAY}/ipfs/{cid}")
    );
    assert!(!uploaded["signature"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn upload_with_case_id_links_the_case() {
    let rig = test_rig();
    let case = Uuid::new_v4();
    let resp = rig
        .app
        .clone()
        .oneshot(upload_request(b"case linked", Some(&case.to_string())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let uploaded = body_json(resp).await;

    let id: Uuid = uploaded["id"].as_str().unwrap().parse().unwrap();
    let record = rig.repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.case_ref, Some(case));
}

#[tokio::test]
async fn upload_without_file_part_is_400() {
    let rig = test_rig();
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"case_id\"\r\n\r\n{}\r\n--{BOUNDARY}--\r\n",
        Uuid::new_v4()
    );
    let request = Request::builder()
        .method("POST")
        .uri("/v1/evidence")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let resp = rig.app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error = body_json(resp).await;
    assert_eq!(error["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn empty_file_uploads_with_the_empty_buffer_digest() {
    // SHA-256 of zero bytes.
    const EMPTY_DIGEST: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    let rig = test_rig();
    let uploaded = upload(&rig, b"").await;
    assert_eq!(uploaded["hash"], EMPTY_DIGEST);

    let resp = rig
        .app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "evidence_id": uploaded["id"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["reason"], "INTEGRITY_OK");
}

#[tokio::test]
async fn upload_with_malformed_case_id_is_400() {
    let rig = test_rig();
    let resp = rig
        .app
        .clone()
        .oneshot(upload_request(b"bytes", Some("not-a-uuid")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_against_offline_store_is_500_and_persists_nothing() {
    let rig = test_rig();
    rig.store.set_offline(true);

    let resp = rig
        .app
        .clone()
        .oneshot(upload_request(b"doomed", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(resp).await;
    assert_eq!(error["error"]["code"], "STORE_UNAVAILABLE");
    // The backend failure detail must not leak to the client.
    assert!(!error["error"]["message"]
        .as_str()
        .unwrap()
        .contains("offline"));
    assert!(rig.repo.is_empty());
}

// ---------------------------------------------------------------------------
// Verification verdicts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_then_verify_is_integrity_ok() {
    let rig = test_rig();
    let uploaded = upload(&rig, b"hello world").await;

    // By record id.
    let resp = rig
        .app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "evidence_id": uploaded["id"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["verified"], true);
    assert_eq!(verdict["reason"], "INTEGRITY_OK");

    // By CID.
    let resp = rig
        .app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "ipfs_cid": uploaded["cid"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["reason"], "INTEGRITY_OK");
}

#[tokio::test]
async fn tampered_content_verifies_as_hash_mismatch_with_200() {
    let rig = test_rig();
    let uploaded = upload(&rig, b"original evidence").await;

    let cid = Cid::new(uploaded["cid"].as_str().unwrap()).unwrap();
    rig.store.corrupt(&cid, b"tampered evidence".to_vec());

    let resp = rig
        .app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "evidence_id": uploaded["id"] }),
        ))
        .await
        .unwrap();
    // A negative verdict is still a 200 answer.
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["verified"], false);
    assert_eq!(verdict["reason"], "HASH_MISMATCH");
    assert!(verdict["details"]
        .as_str()
        .unwrap()
        .contains("altered or corrupted"));
}

#[tokio::test]
async fn legacy_record_verifies_as_legacy_unsigned() {
    let rig = test_rig();
    let legacy_id = Uuid::new_v4();
    rig.repo.insert_raw(EvidenceRecord {
        id: legacy_id,
        case_ref: None,
        cid: Cid::new("bafy-legacy-row").unwrap(),
        digest: None,
        signature: None,
        content_type: "application/pdf".to_string(),
        created_at: Utc::now(),
    });

    let resp = rig
        .app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "evidence_id": legacy_id }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["verified"], false);
    assert_eq!(verdict["reason"], "LEGACY_UNSIGNED");
    assert!(verdict["details"]
        .as_str()
        .unwrap()
        .contains("before cryptographic tracking"));
}

#[tokio::test]
async fn offline_store_verifies_as_store_unreachable() {
    let rig = test_rig();
    let uploaded = upload(&rig, b"fetch me later").await;
    rig.store.set_offline(true);

    let resp = rig
        .app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "evidence_id": uploaded["id"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["reason"], "STORE_UNREACHABLE");
}

#[tokio::test]
async fn unknown_record_is_404() {
    let rig = test_rig();
    let resp = rig
        .app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "evidence_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error = body_json(resp).await;
    assert_eq!(error["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn verify_without_identifier_is_400() {
    let rig = test_rig();
    for body in [serde_json::json!({}), serde_json::json!({ "ipfs_cid": "" })] {
        let resp = rig
            .app
            .clone()
            .oneshot(verify_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn unsigned_upload_verifies_as_signature_invalid() {
    // A deployment without a signing key still digests and pins; the
    // record then fails the signature check, not the digest check.
    let (_, verifying) = RsaSigningKey::generate().unwrap();
    let store = MemoryStore::new();
    let repo = MemoryRepository::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(repo.clone()),
        Signer::unsigned(),
        SignatureVerifier::new(verifying),
        GATEWAY,
        AuthConfig::disabled(),
        None,
    );
    let app = evid_api::app(state);

    let resp = app
        .clone()
        .oneshot(upload_request(b"unsigned mode", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let uploaded = body_json(resp).await;
    assert!(uploaded.get("signature").is_none());

    let resp = app
        .clone()
        .oneshot(verify_request(
            serde_json::json!({ "evidence_id": uploaded["id"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["verified"], false);
    assert_eq!(verdict["reason"], "SIGNATURE_INVALID");
}

// ---------------------------------------------------------------------------
// View, health, OpenAPI
// ---------------------------------------------------------------------------

#[tokio::test]
async fn view_translates_cid_into_gateway_url() {
    let rig = test_rig();
    let uploaded = upload(&rig, b"viewable").await;
    let cid = uploaded["cid"].as_str().unwrap();

    let resp = rig
        .app
        .clone()
        .oneshot(get(&format!("/v1/evidence/view?cid={cid}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["url"], format!("{GATEWAY}/ipfs/{cid}"));
}

#[tokio::test]
async fn view_without_cid_is_400() {
    let rig = test_rig();
    let resp = rig
        .app
        .clone()
        .oneshot(get("/v1/evidence/view"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_probes_respond() {
    let rig = test_rig();
    let resp = rig
        .app
        .clone()
        .oneshot(get("/health/liveness"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // No database configured: readiness has nothing to check and passes.
    let resp = rig
        .app
        .clone()
        .oneshot(get("/health/readiness"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let rig = test_rig();
    let resp = rig
        .app
        .clone()
        .oneshot(get("/openapi.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let spec = body_json(resp).await;
    assert!(spec["paths"]["/v1/evidence"].is_object());
}
