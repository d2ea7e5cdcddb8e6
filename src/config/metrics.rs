//! Metrics configuration.

use super::non_empty;

/// Configuration for application metrics collection
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Unparsable values keep metrics enabled
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = non_empty(lookup, "METRICS_ENABLED")
            .and_then(|v| v.to_lowercase().parse().ok())
            .unwrap_or(true);

        Self { enabled }
    }
}
