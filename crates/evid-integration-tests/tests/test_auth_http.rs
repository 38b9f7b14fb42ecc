//! # Bearer Auth over HTTP
//!
//! Token handling across the evidence routes: 401 for missing or invalid
//! tokens, 403 for a reporter trying to verify, full access for the
//! verifier identity, and unauthenticated health probes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use evid_api::auth::AuthConfig;
use evid_api::state::AppState;
use evid_crypto::{RsaSigningKey, SignatureVerifier, Signer};
use evid_pipeline::MemoryRepository;
use evid_store::MemoryStore;

const REPORTER_TOKEN: &str = "reporter-secret";
const VERIFIER_TOKEN: &str = "verifier-secret";
const BOUNDARY: &str = "evid-auth-boundary";

/// Application with both tokens configured.
fn authed_app() -> axum::Router {
    let (signing, verifying) = RsaSigningKey::generate().unwrap();
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryRepository::new()),
        Signer::new(signing),
        SignatureVerifier::new(verifying),
        "https://ipfs.test.example",
        AuthConfig {
            reporter_token: Some(REPORTER_TOKEN.to_string()),
            verifier_token: Some(VERIFIER_TOKEN.to_string()),
        },
        None,
    );
    evid_api::app(state)
}

fn upload_request(token: Option<&str>) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
         filename=\"e.txt\"\r\nContent-Type: text/plain\r\n\r\nhello world\r\n--{BOUNDARY}--\r\n"
    );
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/evidence")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

fn verify_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/evidence/verify")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_token_is_401() {
    let app = authed_app();
    let resp = app.clone().oneshot(upload_request(None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(verify_request(None, serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_401() {
    let app = authed_app();
    let resp = app
        .clone()
        .oneshot(upload_request(Some("wrong-token")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let error = body_json(resp).await;
    assert_eq!(error["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn reporter_may_upload_but_not_verify() {
    let app = authed_app();
    let resp = app
        .clone()
        .oneshot(upload_request(Some(REPORTER_TOKEN)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let uploaded = body_json(resp).await;

    // The auth check runs before the identifier is even looked at.
    let resp = app
        .clone()
        .oneshot(verify_request(
            Some(REPORTER_TOKEN),
            serde_json::json!({ "evidence_id": uploaded["id"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let error = body_json(resp).await;
    assert_eq!(error["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn verifier_has_full_access() {
    let app = authed_app();
    let resp = app
        .clone()
        .oneshot(upload_request(Some(VERIFIER_TOKEN)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let uploaded = body_json(resp).await;

    let resp = app
        .clone()
        .oneshot(verify_request(
            Some(VERIFIER_TOKEN),
            serde_json::json!({ "evidence_id": uploaded["id"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict = body_json(resp).await;
    assert_eq!(verdict["verified"], true);

    let cid = uploaded["cid"].as_str().unwrap();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/v1/evidence/view?cid={cid}"))
                .header("authorization", format!("Bearer {VERIFIER_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn reporter_cannot_view_content() {
    let app = authed_app();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/v1/evidence/view?cid=bafyabc")
                .header("authorization", format!("Bearer {REPORTER_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_probes_need_no_token() {
    let app = authed_app();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
