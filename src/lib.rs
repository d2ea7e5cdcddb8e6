//! Weather Requests API - record and retrieve weather lookups over HTTP
//!
//! A caller names a location and optionally an inclusive date range. The
//! service fetches the weather from WeatherAPI.com (current conditions, or one
//! historical payload per day in the range), stores one record per payload in
//! a hosted `weather_requests` table, and exposes CRUD endpoints over the
//! stored records.
//!
//! ## Architecture
//!
//! - `config/` - Typed configuration loaded once from the environment
//! - `models/` - Stored records and HTTP request/response bodies
//! - `services/` - Weather fetcher, record stores and the create flow
//! - `handlers/` - HTTP handlers and the app factory
//! - `middleware/` - Request IDs and Prometheus request metrics
//! - `telemetry` - Tracing subscriber setup
//! - `utils/` - Date and routing helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use actix_web::{HttpServer, web};
//! use weather_requests_api::{
//!     AppMetrics, AppState, InMemoryStore, MetricsConfig, WeatherApiClient, WeatherApiConfig,
//!     create_app,
//! };
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let metrics = AppMetrics::new().expect("metrics registry");
//!     let fetcher = WeatherApiClient::new(WeatherApiConfig::new("my-api-key"), Some(metrics.clone()))
//!         .expect("http client");
//!     let state = web::Data::new(AppState::new(Arc::new(fetcher), Arc::new(InMemoryStore::new())));
//!     let metrics = web::Data::new(metrics);
//!
//!     HttpServer::new(move || create_app(state.clone(), metrics.clone(), MetricsConfig::default()))
//!         .bind(("127.0.0.1", 8080))?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use config::{AppConfig, ConfigError, MetricsConfig, PostgrestConfig, StoreConfig, WeatherApiConfig};
pub use handlers::{
    ApiError, create_app, create_openapi_spec, create_request, delete_request, get_metrics,
    get_request, health, home, list_requests, update_request, version,
};
pub use middleware::{MetricsMiddleware, RequestId, RequestIdMiddleware};
pub use models::{
    CreateWeatherRequest, ErrorResponse, FilterError, NewWeatherRequest, RecordFilters,
    RecordType, UpdateWeatherRequest, WeatherRequestPatch, WeatherRequestRecord,
};
pub use services::{
    AppMetrics, CreateError, DailyWeather, FetchError, InMemoryStore, PostgrestStore, RecordStore,
    StoreError, WeatherApiClient, WeatherFetch, WeatherFetcher, WeatherRequestService,
};
pub use state::AppState;
pub use telemetry::{LogConfig, init_tracing};
