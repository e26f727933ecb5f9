//! # Extraction Helpers
//!
//! Map axum rejections and path parameters onto [`AppError`] so that every
//! failure uses the structured error body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;

use credreg_core::{CredentialId, Identity};

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// Handlers take `body: Result<Json<T>, JsonRejection>` and call this.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract query parameters, mapping errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse an identity path segment. Malformed values are 422.
pub fn identity_param(raw: &str) -> Result<Identity, AppError> {
    Ok(Identity::parse(raw)?)
}

/// Parse a credential id path segment. Zero and non-numbers are 422.
pub fn credential_id_param(raw: &str) -> Result<CredentialId, AppError> {
    Ok(raw.parse::<CredentialId>()?)
}
