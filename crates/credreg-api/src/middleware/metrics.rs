//! # Request Metrics
//!
//! In-process counters served as JSON at `/v1/metrics`. Besides totals,
//! the outcomes that matter to registry operators are broken out: role
//! denials (403), lifecycle conflicts such as double revocation (409) and
//! throttled callers (429).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    errors: AtomicU64,
    forbidden: AtomicU64,
    conflicts: AtomicU64,
    rate_limited: AtomicU64,
}

/// Shared metrics handle; clones update the same counters.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    counters: Arc<Counters>,
}

/// Point-in-time counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    /// Every 4xx and 5xx response.
    pub errors: u64,
    pub forbidden: u64,
    pub conflicts: u64,
    pub rate_limited: u64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, status: StatusCode) {
        let c = &self.counters;
        c.requests.fetch_add(1, Ordering::Relaxed);
        if status.is_client_error() || status.is_server_error() {
            c.errors.fetch_add(1, Ordering::Relaxed);
        }
        let bucket = match status {
            StatusCode::FORBIDDEN => &c.forbidden,
            StatusCode::CONFLICT => &c.conflicts,
            StatusCode::TOO_MANY_REQUESTS => &c.rate_limited,
            _ => return,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        MetricsSnapshot {
            requests: c.requests.load(Ordering::Relaxed),
            errors: c.errors.load(Ordering::Relaxed),
            forbidden: c.forbidden.load(Ordering::Relaxed),
            conflicts: c.conflicts.load(Ordering::Relaxed),
            rate_limited: c.rate_limited.load(Ordering::Relaxed),
        }
    }
}

/// Counts each response once it has been produced.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let response = next.run(request).await;
    if let Some(metrics) = metrics {
        metrics.record(response.status());
    }
    response
}
