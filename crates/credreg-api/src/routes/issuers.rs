//! # Issuer Administration
//!
//! - `GET /v1/issuers`: authorized issuers, sorted.
//! - `POST /v1/issuers`: grant the issuer role (administrator only).
//! - `GET /v1/issuers/{identity}`: whether an identity is authorized.
//! - `DELETE /v1/issuers/{identity}`: revoke the issuer role (administrator only).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use credreg_core::Identity;
use credreg_registry::RegistryEvent;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_json, identity_param};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddIssuerRequest {
    pub issuer: Identity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssuerListResponse {
    pub issuers: Vec<Identity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssuerStatusResponse {
    pub identity: Identity,
    pub authorized: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/issuers", get(list_issuers).post(add_issuer))
        .route(
            "/v1/issuers/{identity}",
            get(issuer_status).delete(remove_issuer),
        )
}

async fn list_issuers(State(state): State<AppState>) -> Json<IssuerListResponse> {
    Json(IssuerListResponse {
        issuers: state.registry.issuers(),
    })
}

async fn add_issuer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<AddIssuerRequest>, JsonRejection>,
) -> Result<Json<RegistryEvent>, AppError> {
    let req = extract_json(body)?;
    let event = state.registry.add_issuer(caller.identity(), req.issuer)?;
    Ok(Json(event))
}

async fn issuer_status(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<IssuerStatusResponse>, AppError> {
    let identity = identity_param(&raw)?;
    Ok(Json(IssuerStatusResponse {
        identity,
        authorized: state.registry.is_authorized_issuer(&identity),
    }))
}

async fn remove_issuer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(raw): Path<String>,
) -> Result<Json<RegistryEvent>, AppError> {
    let target = identity_param(&raw)?;
    let event = state.registry.remove_issuer(caller.identity(), target)?;
    Ok(Json(event))
}
