//! # evid-api — Axum HTTP Surface for the Evidence Integrity Stack
//!
//! Exposes the ingestion and verification pipelines over HTTP.
//!
//! ## API Surface
//!
//! | Route                      | Method | Access            |
//! |----------------------------|--------|-------------------|
//! | `/v1/evidence`             | POST   | reporter/verifier |
//! | `/v1/evidence/verify`      | POST   | verifier only     |
//! | `/v1/evidence/view`        | GET    | verifier only     |
//! | `/openapi.json`            | GET    | authenticated     |
//! | `/health/liveness`         | GET    | unauthenticated   |
//! | `/health/readiness`        | GET    | unauthenticated   |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Maximum accepted upload size. Evidence files are documents, screenshots,
/// and log archives; anything larger belongs in cold storage, not a report.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware so
/// they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    if !state.auth.enabled() {
        tracing::warn!("no auth tokens configured — all requests run with the verifier role");
    }

    let api = Router::new()
        .merge(routes::evidence::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(state.auth.clone()))
        .with_state(state.clone());

    let unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks the database connection when one is configured. The store is not
/// probed here: a dead pinning backend degrades individual requests to
/// `STORE_UNAVAILABLE` errors or `STORE_UNREACHABLE` verdicts rather than
/// taking the service out of rotation.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
