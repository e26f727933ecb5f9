//! # Event Journal
//!
//! `GET /v1/events?since=N`: journal entries with a sequence greater than
//! `N` (default 0). Observers poll with the last sequence they have seen.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use credreg_registry::EventRecord;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub since: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
    /// Newest sequence in the journal at the time of the read.
    pub last_sequence: u64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/events", get(events_since))
}

async fn events_since(
    State(state): State<AppState>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, AppError> {
    let query = extract_query(query)?;
    // One read lock for both values so they agree.
    let (events, last_sequence) = state
        .registry
        .read(|r| (r.events_since(query.since).to_vec(), r.last_sequence()));
    Ok(Json(EventsResponse {
        events,
        last_sequence,
    }))
}
