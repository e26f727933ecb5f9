//! # Application State and Configuration
//!
//! [`AppState`] is passed to every route handler via the `State`
//! extractor. It holds the shared registry handle and the configuration
//! the service was started with.

use thiserror::Error;

use credreg_core::{Identity, ValidationError};
use credreg_registry::SharedRegistry;

use crate::middleware::rate_limit::RateLimitConfig;

// -- Configuration ------------------------------------------------------------

/// Errors raised while loading [`AppConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `REGISTRY_ADMIN` is not set.
    #[error("REGISTRY_ADMIN environment variable is required")]
    MissingAdministrator,

    /// `REGISTRY_ADMIN` is not a valid identity.
    #[error("invalid REGISTRY_ADMIN: {0}")]
    InvalidAdministrator(#[from] ValidationError),

    /// A numeric variable did not parse.
    #[error("invalid {var}: \"{value}\" is not a valid number")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Service configuration.
///
/// Custom `Debug` redacts the auth token.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer secret. `None` enables development mode, in which the
    /// `X-Caller-Identity` header is trusted.
    pub auth_token: Option<String>,
    /// Administrator of the registry at startup.
    pub administrator: Identity,
    pub rate_limit: RateLimitConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("administrator", &self.administrator)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl AppConfig {
    /// Default configuration for the given administrator: port 8080,
    /// development-mode auth, default rate limits.
    pub fn new(administrator: Identity) -> Self {
        Self {
            port: 8080,
            auth_token: None,
            administrator,
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `REGISTRY_ADMIN` (required)
    /// - `PORT` (default: 8080)
    /// - `AUTH_TOKEN` (optional)
    /// - `RATE_LIMIT_MAX_REQUESTS` (default: 1000)
    /// - `RATE_LIMIT_WINDOW_SECS` (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let administrator = lookup("REGISTRY_ADMIN").ok_or(ConfigError::MissingAdministrator)?;
        let mut config = Self::new(Identity::parse(administrator.trim())?);

        if let Some(port) = parse_var(&lookup, "PORT")? {
            config.port = port;
        }
        config.auth_token = lookup("AUTH_TOKEN").filter(|t| !t.is_empty());
        if let Some(max) = parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS")? {
            config.rate_limit.max_requests = max;
        }
        if let Some(window) = parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS")? {
            config.rate_limit.window_secs = window;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value })
        })
        .transpose()
}

// -- Application State --------------------------------------------------------

/// Shared state for all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub config: AppConfig,
}

impl AppState {
    /// Create state with a fresh registry administered by `config.administrator`.
    pub fn new(config: AppConfig) -> Self {
        Self {
            registry: SharedRegistry::new(config.administrator),
            config,
        }
    }
}
