//! Shared application state handed to every handler.

use crate::config::{AppConfig, StoreConfig};
use crate::services::{
    AppMetrics, InMemoryStore, PostgrestStore, RecordStore, WeatherApiClient, WeatherFetcher,
    WeatherRequestService,
};
use std::sync::Arc;

/// Fetcher, store and the create flow built on top of them
#[derive(Clone)]
pub struct AppState {
    pub requests: Arc<WeatherRequestService>,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            requests: Arc::new(WeatherRequestService::new(fetcher, Arc::clone(&store))),
            store,
        }
    }

    /// Build the production fetcher and the configured store backend
    pub fn from_config(config: &AppConfig, metrics: &AppMetrics) -> Result<Self, reqwest::Error> {
        let fetcher = WeatherApiClient::new(config.weather.clone(), Some(metrics.clone()))?;
        let store: Arc<dyn RecordStore> = match &config.store {
            StoreConfig::Postgrest(pg) => Arc::new(PostgrestStore::new(pg.clone())?),
            StoreConfig::Memory => Arc::new(InMemoryStore::new()),
        };
        Ok(Self::new(Arc::new(fetcher), store))
    }
}
