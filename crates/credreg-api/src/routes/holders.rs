//! # Holder Lookups
//!
//! `GET /v1/holders/{identity}/credentials`: ids issued to a holder in
//! issuance order, revoked ones included. Unknown holders get an empty list.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use credreg_core::{CredentialId, Identity};

use crate::error::AppError;
use crate::extractors::identity_param;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HolderCredentialsResponse {
    pub holder: Identity,
    pub credential_ids: Vec<CredentialId>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/holders/{identity}/credentials", get(credentials_of))
}

async fn credentials_of(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<HolderCredentialsResponse>, AppError> {
    let holder = identity_param(&raw)?;
    Ok(Json(HolderCredentialsResponse {
        holder,
        credential_ids: state.registry.get_credentials_of(&holder),
    }))
}
