//! # Caller Authentication
//!
//! Resolves the caller identity for each request and injects it into the
//! request extensions as a [`CallerIdentity`]. Whether that caller may do
//! what it asks is decided by the registry, not here.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer {identity}:{secret}   (AUTH_TOKEN set)
//! X-Caller-Identity: {identity}               (development mode)
//! ```
//!
//! A request without credentials stays anonymous. Read endpoints accept
//! anonymous callers; mutating endpoints extract [`CallerIdentity`] and
//! reject anonymous requests with 401.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use credreg_core::Identity;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Header trusted as the caller identity when auth is disabled.
pub const CALLER_IDENTITY_HEADER: &str = "x-caller-identity";

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// The authenticated caller, available to handlers via `FromRequestParts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity(pub Identity);

impl CallerIdentity {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Returns 401 if the auth middleware did not resolve a caller.
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("caller identity required".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of shared secrets.
///
/// When lengths differ, performs a dummy comparison so that timing does
/// not depend on where the mismatch is.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token of the form `{identity}:{secret}`.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let (identity, secret) = provided
        .split_once(':')
        .ok_or_else(|| "invalid token format, expected {identity}:{secret}".to_string())?;

    if !constant_time_token_eq(secret, expected_secret) {
        return Err("invalid bearer token".into());
    }

    Identity::parse(identity)
        .map(CallerIdentity)
        .map_err(|e| e.to_string())
}

/// Resolve the caller from request headers.
///
/// `Ok(None)` means the request carries no credentials.
fn resolve_caller(headers: &HeaderMap, config: &AuthConfig) -> Result<Option<CallerIdentity>, String> {
    match &config.token {
        Some(expected) => {
            let Some(value) = headers.get(header::AUTHORIZATION) else {
                return Ok(None);
            };
            let value = value
                .to_str()
                .map_err(|_| "authorization header is not valid ASCII".to_string())?;
            let provided = value
                .strip_prefix("Bearer ")
                .ok_or_else(|| "authorization header must use Bearer scheme".to_string())?;
            parse_bearer_token(provided, expected).map(Some)
        }
        None => {
            let Some(value) = headers.get(CALLER_IDENTITY_HEADER) else {
                return Ok(None);
            };
            let value = value
                .to_str()
                .map_err(|_| "caller identity header is not valid ASCII".to_string())?;
            Identity::parse(value)
                .map(|id| Some(CallerIdentity(id)))
                .map_err(|e| e.to_string())
        }
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Resolve the caller and inject it into request extensions.
///
/// Presented but invalid credentials are rejected with 401; absent
/// credentials pass through anonymously.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<AuthConfig>()
        .cloned()
        .unwrap_or_default();

    match resolve_caller(request.headers(), &config) {
        Ok(Some(caller)) => {
            tracing::debug!(caller = %caller.0, "caller authenticated");
            request.extensions_mut().insert(caller);
        }
        Ok(None) => {}
        Err(msg) => {
            tracing::warn!(reason = %msg, "authentication failed");
            return unauthorized_response(&msg);
        }
    }

    next.run(request).await
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
