//! # Bearer Token Authentication
//!
//! Two static bearer tokens, resolved by middleware into a per-request
//! [`CallerIdentity`]: the reporter token authorizes evidence upload, the
//! verifier token additionally authorizes verification and content view.
//! There is no process-wide "current user" — identity travels with the
//! request as an extension.
//!
//! When neither token is configured, authentication is disabled and every
//! request runs with the verifier role. This is the development and test
//! mode; the server logs it loudly at startup.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Static token configuration, injected as a router extension.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Token accepted for evidence upload.
    pub reporter_token: Option<String>,
    /// Token accepted for verification and content view. Implies upload.
    pub verifier_token: Option<String>,
}

impl AuthConfig {
    /// No tokens — authentication disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether any token is configured.
    pub fn enabled(&self) -> bool {
        self.reporter_token.is_some() || self.verifier_token.is_some()
    }
}

/// The role a bearer token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    /// May upload evidence.
    Reporter,
    /// May upload, verify, and view evidence.
    Verifier,
}

/// Per-request caller identity, inserted by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub role: CallerRole,
}

impl CallerIdentity {
    /// Require the privileged verifier role.
    pub fn require_verifier(&self) -> Result<(), AppError> {
        match self.role {
            CallerRole::Verifier => Ok(()),
            CallerRole::Reporter => Err(AppError::Forbidden(
                "verification requires the verifier identity".to_string(),
            )),
        }
    }
}

/// Constant-time token comparison. Unset tokens never match.
fn token_matches(expected: Option<&str>, presented: &str) -> bool {
    match expected {
        Some(expected) => bool::from(expected.as_bytes().ct_eq(presented.as_bytes())),
        None => false,
    }
}

/// Extract the bearer token from the `Authorization` header.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolve the bearer token to a [`CallerIdentity`] and insert it into
/// request extensions, or reject with 401.
pub async fn auth_middleware(
    Extension(config): Extension<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    if !config.enabled() {
        request
            .extensions_mut()
            .insert(CallerIdentity {
                role: CallerRole::Verifier,
            });
        return next.run(request).await;
    }

    let Some(token) = bearer_token(&request) else {
        return AppError::Unauthorized("missing bearer token".to_string()).into_response();
    };

    // The verifier token is checked first so a deployment that reuses one
    // token for both slots grants the stronger role.
    let role = if token_matches(config.verifier_token.as_deref(), token) {
        CallerRole::Verifier
    } else if token_matches(config.reporter_token.as_deref(), token) {
        CallerRole::Reporter
    } else {
        return AppError::Unauthorized("invalid bearer token".to_string()).into_response();
    };

    request.extensions_mut().insert(CallerIdentity { role });
    next.run(request).await
}
