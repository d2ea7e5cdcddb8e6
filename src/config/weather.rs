//! Weather provider configuration.

use super::{ConfigError, non_empty};

/// Default WeatherAPI.com base URL
pub const DEFAULT_WEATHER_API_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Configuration for the WeatherAPI.com client
#[derive(Debug, Clone)]
pub struct WeatherApiConfig {
    pub api_key: String,
    /// Base URL without a trailing slash, e.g. `http://api.weatherapi.com/v1`
    pub base_url: String,
}

impl WeatherApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_WEATHER_API_BASE_URL.to_string(),
        }
    }

    /// Override the provider base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(lookup, "API_KEY").ok_or(ConfigError::Missing("API_KEY"))?;

        let config = Self::new(api_key);
        Ok(match non_empty(lookup, "WEATHER_API_BASE_URL") {
            Some(base_url) => {
                url::Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
                    var: "WEATHER_API_BASE_URL",
                    reason: e.to_string(),
                })?;
                config.with_base_url(base_url)
            }
            None => config,
        })
    }
}
