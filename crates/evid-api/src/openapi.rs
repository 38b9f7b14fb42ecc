//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented evidence routes into a single OpenAPI
//! spec, served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Bearer token authentication. Reporter and verifier tokens \
                             are set via EVID_REPORTER_TOKEN and EVID_VERIFIER_TOKEN.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the evidence integrity surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Evidence Integrity API",
        version = "0.3.2",
        description = "Tamper-evident evidence handling for cyber-incident reports.\n\nEvery uploaded file is SHA-256 digested, RSA-signed, and pinned to content-addressed storage; verification re-fetches the content, recomputes the digest, and validates it against the persisted digest and signature.\n\nAuthentication: Bearer token via `Authorization: Bearer <token>`. All `/v1/*` endpoints require authentication; verification and content view additionally require the verifier identity. Health probes (`/health/*`) are unauthenticated.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        crate::routes::evidence::upload_evidence,
        crate::routes::evidence::verify_evidence,
        crate::routes::evidence::view_evidence,
    ),
    components(schemas(
        crate::routes::evidence::UploadResponse,
        crate::routes::evidence::VerifyRequest,
        crate::routes::evidence::VerifyResponse,
        crate::routes::evidence::ViewResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "evidence", description = "Evidence upload, verification, and gated view")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
