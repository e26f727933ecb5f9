//! # credreg-api: Binary Entry Point
//!
//! Starts the credential registry HTTP server. Configuration comes from
//! the environment; see [`credreg_api::state::AppConfig::from_env`].

use credreg_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;
    tracing::debug!(?config, "loaded configuration");

    credreg_api::serve(AppState::new(config)).await?;
    Ok(())
}
