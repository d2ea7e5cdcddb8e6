//! Weather provider client for WeatherAPI.com.
//!
//! A fetch without a date range asks the `current.json` endpoint once. A fetch
//! with both dates walks the range one day at a time against `history.json`,
//! awaiting each call before starting the next. Provider failures are data:
//! a failed current lookup or a failed day is kept in the result as that
//! element's error, and the remaining days are still fetched.

use crate::config::WeatherApiConfig;
use crate::services::metrics::AppMetrics;
use crate::utils::dates::days_inclusive;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

/// Errors produced while talking to the weather provider
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Location is required.")]
    MissingLocation,

    #[error("Failed to retrieve current weather: {status}")]
    CurrentFailed { status: u16 },

    #[error("Failed for {date}: {status}")]
    DayFailed { date: NaiveDate, status: u16 },

    #[error("Weather provider request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Weather provider returned an unreadable body: {0}")]
    Decode(String),
}

/// One day of a historical fetch
#[derive(Debug)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub result: Result<Value, FetchError>,
}

/// Raw provider payloads returned by a fetch
#[derive(Debug)]
pub enum WeatherFetch {
    /// Single `current.json` response, or why it could not be obtained
    Current(Result<Value, FetchError>),
    /// One entry per day of the requested range, in ascending date order
    History(Vec<DailyWeather>),
}

impl WeatherFetch {
    pub fn len(&self) -> usize {
        match self {
            WeatherFetch::Current(_) => 1,
            WeatherFetch::History(days) => days.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source of raw weather data
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    /// Fetch current weather, or one payload per day when both dates are given.
    ///
    /// Only a blank location fails the whole fetch; provider failures are
    /// carried inside the returned [`WeatherFetch`].
    async fn fetch(
        &self,
        location: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<WeatherFetch, FetchError>;
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Current,
    History,
}

impl Endpoint {
    fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "current.json",
            Endpoint::History => "history.json",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::History => "history",
        }
    }
}

/// WeatherAPI.com client
pub struct WeatherApiClient {
    http: Client,
    config: WeatherApiConfig,
    metrics: Option<AppMetrics>,
}

impl WeatherApiClient {
    /// Create a client using the transport's default timeouts
    pub fn new(config: WeatherApiConfig, metrics: Option<AppMetrics>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("weather-requests-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            metrics,
        })
    }

    async fn fetch_current(&self, location: &str) -> Result<Value, FetchError> {
        let result = self
            .call(Endpoint::Current, location, None, |status| {
                FetchError::CurrentFailed { status }
            })
            .await;
        if let Err(e) = &result {
            warn!(location = %location, error = %e, "Current weather fetch failed");
        }
        result
    }

    async fn fetch_history(&self, location: &str, start: NaiveDate, end: NaiveDate) -> Vec<DailyWeather> {
        let mut days = Vec::new();
        for date in days_inclusive(start, end) {
            let result = self
                .call(Endpoint::History, location, Some(date), |status| {
                    FetchError::DayFailed { date, status }
                })
                .await;
            if let Err(e) = &result {
                warn!(location = %location, date = %date, error = %e, "History fetch failed for day");
            }
            days.push(DailyWeather { date, result });
        }
        days
    }

    async fn call<F>(
        &self,
        endpoint: Endpoint,
        location: &str,
        date: Option<NaiveDate>,
        on_status: F,
    ) -> Result<Value, FetchError>
    where
        F: FnOnce(u16) -> FetchError,
    {
        let url = format!("{}/{}", self.config.base_url, endpoint.path());
        let mut query = vec![
            ("key", self.config.api_key.clone()),
            ("q", location.to_string()),
        ];
        if let Some(date) = date {
            query.push(("dt", date.format("%Y-%m-%d").to_string()));
        }
        query.push(("aqi", "no".to_string()));

        let result = async {
            let response = self
                .http
                .get(&url)
                .query(&query)
                .send()
                .await
                // The URL carries the API key; keep it out of error messages
                .map_err(|e| FetchError::Transport(e.without_url()))?;

            let status = response.status();
            debug!(
                endpoint = endpoint.label(),
                location = %location,
                date = ?date,
                status = status.as_u16(),
                "Weather provider responded"
            );
            if !status.is_success() {
                return Err(on_status(status.as_u16()));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| FetchError::Decode(e.without_url().to_string()))
        }
        .await;

        if let Some(metrics) = &self.metrics {
            metrics.record_provider_call(endpoint.label(), result.is_ok());
        }
        result
    }
}

#[async_trait]
impl WeatherFetcher for WeatherApiClient {
    async fn fetch(
        &self,
        location: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<WeatherFetch, FetchError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(FetchError::MissingLocation);
        }

        match (start_date, end_date) {
            (Some(start), Some(end)) => Ok(WeatherFetch::History(
                self.fetch_history(location, start, end).await,
            )),
            _ => Ok(WeatherFetch::Current(self.fetch_current(location).await)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> WeatherApiClient {
        let config = WeatherApiConfig::new("test-key").with_base_url("http://127.0.0.1:9");
        WeatherApiClient::new(config, None).unwrap()
    }

    #[test]
    fn test_error_messages() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(FetchError::MissingLocation.to_string(), "Location is required.");
        assert_eq!(
            FetchError::CurrentFailed { status: 401 }.to_string(),
            "Failed to retrieve current weather: 401"
        );
        assert_eq!(
            FetchError::DayFailed { date, status: 400 }.to_string(),
            "Failed for 2024-03-01: 400"
        );
    }

    #[test]
    fn test_fetch_len() {
        assert_eq!(WeatherFetch::Current(Ok(json!({}))).len(), 1);
        assert_eq!(
            WeatherFetch::Current(Err(FetchError::CurrentFailed { status: 500 })).len(),
            1
        );
        assert!(WeatherFetch::History(vec![]).is_empty());
    }

    #[tokio::test]
    async fn test_blank_location_rejected_without_network() {
        let result = client().fetch("   ", None, None).await;
        assert!(matches!(result, Err(FetchError::MissingLocation)));
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        // Port 9 (discard) is closed on test hosts, so the connect fails
        let fetched = client().fetch("London", None, None).await.unwrap();
        let WeatherFetch::Current(Err(err)) = fetched else {
            panic!("expected an in-band transport error");
        };
        assert!(matches!(err, FetchError::Transport(_)));
        assert!(!err.to_string().contains("test-key"));
    }
}
