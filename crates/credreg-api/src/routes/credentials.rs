//! # Credential Issuance and Revocation
//!
//! ## Endpoints
//!
//! - `POST /v1/credentials`: issue (authorized issuers only).
//! - `GET /v1/credentials/{id}`: read a record.
//! - `POST /v1/credentials/{id}/revoke`: revoke (original issuer only).
//! - `GET /v1/credentials/{id}/verify`: whether a credential exists and stands.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use credreg_core::{CredentialId, Identity, Timestamp};
use credreg_registry::{CredentialRecord, RegistryEvent};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{credential_id_param, extract_json};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for credential issuance.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueCredentialRequest {
    pub holder: Identity,
    pub credential_type: String,
    #[serde(default)]
    pub metadata_uri: String,
}

/// Response from a successful issuance.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueCredentialResponse {
    pub id: CredentialId,
    pub event: RegistryEvent,
}

/// Request body for revocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeCredentialRequest {
    pub reason: String,
}

/// Flat API view of a credential record.
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialView {
    pub id: CredentialId,
    pub holder: Identity,
    pub issuer: Identity,
    pub credential_type: String,
    pub metadata_uri: String,
    pub issued_at: Timestamp,
    /// `VALID` or `REVOKED`.
    pub status: String,
    /// Empty while the credential is valid.
    pub revocation_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<Timestamp>,
}

impl From<CredentialRecord> for CredentialView {
    fn from(record: CredentialRecord) -> Self {
        Self {
            status: record.status.to_string(),
            revocation_reason: record.revocation_reason().to_string(),
            revoked_at: record.revoked_at(),
            id: record.id,
            holder: record.holder,
            issuer: record.issuer,
            credential_type: record.credential_type,
            metadata_uri: record.metadata_uri,
            issued_at: record.issued_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub id: CredentialId,
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/credentials", post(issue_credential))
        .route("/v1/credentials/{id}", get(get_credential))
        .route("/v1/credentials/{id}/revoke", post(revoke_credential))
        .route("/v1/credentials/{id}/verify", get(verify_credential))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/credentials: the caller becomes the credential's issuer.
async fn issue_credential(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<IssueCredentialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueCredentialResponse>), AppError> {
    let req = extract_json(body)?;
    let (id, event) = state.registry.issue_credential(
        caller.identity(),
        req.holder,
        req.credential_type,
        req.metadata_uri,
    )?;
    Ok((StatusCode::CREATED, Json(IssueCredentialResponse { id, event })))
}

async fn get_credential(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<CredentialView>, AppError> {
    let id = credential_id_param(&raw)?;
    let record = state.registry.get_credential_by_id(id)?;
    Ok(Json(record.into()))
}

/// POST /v1/credentials/{id}/revoke
///
/// 404 when the id was never issued, 403 when the caller is not the
/// original issuer, 409 when already revoked, checked in that order.
async fn revoke_credential(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(raw): Path<String>,
    body: Result<Json<RevokeCredentialRequest>, JsonRejection>,
) -> Result<Json<RegistryEvent>, AppError> {
    let id = credential_id_param(&raw)?;
    let req = extract_json(body)?;
    let event = state
        .registry
        .revoke_credential(caller.identity(), id, req.reason)?;
    Ok(Json(event))
}

async fn verify_credential(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<VerificationResponse>, AppError> {
    let id = credential_id_param(&raw)?;
    Ok(Json(VerificationResponse {
        id,
        valid: state.registry.verify_credential(id),
    }))
}
