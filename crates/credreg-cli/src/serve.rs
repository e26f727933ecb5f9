//! # Serve Subcommand
//!
//! Runs the HTTP service in the foreground. Every flag falls back to the
//! environment variable the `credreg-api` binary reads.

use anyhow::{Context, Result};
use clap::Args;

use credreg_api::middleware::rate_limit::RateLimitConfig;
use credreg_api::state::{AppConfig, AppState};
use credreg_core::Identity;

/// Arguments for `credreg serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Initial administrator identity.
    #[arg(long, env = "REGISTRY_ADMIN")]
    pub admin: Identity,

    /// Shared bearer secret. Omit for development mode.
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Requests allowed per caller per window.
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 1000)]
    pub rate_limit_max_requests: u64,

    /// Rate limit window in seconds.
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 60)]
    pub rate_limit_window_secs: u64,
}

impl ServeArgs {
    pub fn config(&self) -> AppConfig {
        AppConfig {
            port: self.port,
            auth_token: self.auth_token.clone().filter(|t| !t.is_empty()),
            administrator: self.admin,
            rate_limit: RateLimitConfig {
                max_requests: self.rate_limit_max_requests,
                window_secs: self.rate_limit_window_secs,
            },
        }
    }
}

/// Execute `credreg serve`. Returns only when the server stops.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let config = args.config();
    tracing::debug!(?config, "serve configuration");

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(credreg_api::serve(AppState::new(config)))
        .with_context(|| format!("HTTP server on port {} failed", args.port))?;

    Ok(0)
}
