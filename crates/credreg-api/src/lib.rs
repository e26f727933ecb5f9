//! # credreg-api: HTTP Service for the Credential Registry
//!
//! Exposes a [`credreg_registry::SharedRegistry`] over JSON/HTTP. Every
//! state-changing request is attributed to a caller identity resolved by
//! [`auth::auth_middleware`]; the registry itself decides whether that
//! caller may perform the operation.
//!
//! ## API Surface
//!
//! | Route                                   | Module                   |
//! |-----------------------------------------|--------------------------|
//! | `GET /v1/registry`                      | [`routes::registry`]     |
//! | `PUT /v1/registry/administrator`        | [`routes::registry`]     |
//! | `GET, POST /v1/issuers`                 | [`routes::issuers`]      |
//! | `GET, DELETE /v1/issuers/{identity}`    | [`routes::issuers`]      |
//! | `POST /v1/credentials`                  | [`routes::credentials`]  |
//! | `GET /v1/credentials/{id}`              | [`routes::credentials`]  |
//! | `POST /v1/credentials/{id}/revoke`      | [`routes::credentials`]  |
//! | `GET /v1/credentials/{id}/verify`       | [`routes::credentials`]  |
//! | `GET /v1/holders/{identity}/credentials`| [`routes::holders`]      |
//! | `GET /v1/events?since=N`                | [`routes::events`]       |
//! | `GET /v1/metrics`                       | [`routes::registry`]     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → RateLimitMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::middleware::rate_limit::RateLimiter;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();
    let limiter = RateLimiter::new(state.config.rate_limit.clone());

    let api = Router::new()
        .merge(routes::registry::router())
        .merge(routes::issuers::router())
        .merge(routes::credentials::router())
        .merge(routes::holders::router())
        .merge(routes::events::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .layer(axum::Extension(limiter))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Bind `0.0.0.0:{config.port}` and serve until the process is stopped.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let dev_mode = state.config.auth_token.is_none();
    let administrator = state.config.administrator;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %administrator, dev_mode, "credential registry listening");
    if dev_mode {
        tracing::warn!("AUTH_TOKEN not set; trusting the X-Caller-Identity header");
    }

    axum::serve(listener, app(state)).await
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the registry is in memory, so ready once serving.
async fn readiness() -> &'static str {
    "ready"
}
