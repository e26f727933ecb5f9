//! # Registry Overview and Administration
//!
//! - `GET /v1/registry`: administrator, issuer and credential counts,
//!   newest journal sequence.
//! - `PUT /v1/registry/administrator`: hand over the administrator role.
//! - `GET /v1/metrics`: request counters.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};

use credreg_core::Identity;
use credreg_registry::{RegistryEvent, RegistrySummary};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};
use crate::state::AppState;

/// Request body for an administrator transfer.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferAdministrationRequest {
    pub administrator: Identity,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/registry", get(summary))
        .route("/v1/registry/administrator", put(transfer_administration))
        .route("/v1/metrics", get(metrics))
}

async fn summary(State(state): State<AppState>) -> Json<RegistrySummary> {
    Json(state.registry.summary())
}

/// PUT /v1/registry/administrator: administrator only.
async fn transfer_administration(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<TransferAdministrationRequest>, JsonRejection>,
) -> Result<Json<RegistryEvent>, AppError> {
    let req = extract_json(body)?;
    let event = state
        .registry
        .transfer_administration(caller.identity(), req.administrator)?;
    Ok(Json(event))
}

async fn metrics(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
