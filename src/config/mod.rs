//! Configuration structures and loading utilities.
//!
//! Everything is read once at startup into an [`AppConfig`] and handed to the
//! constructors that need it. Values come from the process environment (and an
//! optional `.env` file loaded in `main`); each loader also accepts a lookup
//! function so tests can supply variables without touching the environment.

pub mod metrics;
pub mod server;
pub mod store;
pub mod weather;

pub use metrics::*;
pub use server::*;
pub use store::*;
pub use weather::*;

use std::env;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub weather: WeatherApiConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            weather: WeatherApiConfig::from_lookup(&lookup)?,
            store: StoreConfig::from_lookup(&lookup)?,
            server: ServerConfig::from_lookup(&lookup)?,
            metrics: MetricsConfig::from_lookup(&lookup),
        })
    }
}

/// Read a variable, treating blank values as unset
pub(crate) fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
