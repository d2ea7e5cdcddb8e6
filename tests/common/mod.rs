//! Shared fakes for the integration tests.
//!
//! `FakeFetcher` and `CountingStore` stand in for the service seams, while
//! `spawn_fake_provider` and `spawn_fake_postgrest` run real HTTP servers on an
//! ephemeral port so the production clients can be exercised end to end.

#![allow(dead_code)]

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use weather_requests_api::{
    AppMetrics, AppState, FetchError, InMemoryStore, MetricsConfig, NewWeatherRequest,
    RecordFilters, RecordStore, StoreError, WeatherFetch, WeatherFetcher, WeatherRequestPatch,
    WeatherRequestRecord, create_app,
};

pub const API_KEY: &str = "test-key";
pub const STORE_KEY: &str = "service-key";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Payload shaped like a WeatherAPI `current.json` response
pub fn current_payload(name: &str, last_updated: &str) -> Value {
    json!({
        "location": {"name": name, "country": "United Kingdom"},
        "current": {"last_updated": last_updated, "temp_c": 11.0}
    })
}

/// Payload shaped like a WeatherAPI `history.json` response for one day
pub fn history_payload(name: &str, day: NaiveDate) -> Value {
    json!({
        "location": {"name": name},
        "forecast": {"forecastday": [{"date": day.to_string(), "day": {"avgtemp_c": 9.5}}]}
    })
}

type FetchFn =
    dyn Fn(&str, Option<NaiveDate>, Option<NaiveDate>) -> Result<WeatherFetch, FetchError> + Send + Sync;

/// Fetcher returning canned results and counting its calls
pub struct FakeFetcher {
    respond: Box<FetchFn>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str, Option<NaiveDate>, Option<NaiveDate>) -> Result<WeatherFetch, FetchError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with one current-weather payload
    pub fn current(payload: Value) -> Self {
        Self::new(move |_, _, _| Ok(WeatherFetch::Current(Ok(payload.clone()))))
    }

    /// Answers range fetches with one history payload per day
    pub fn history(name: &'static str) -> Self {
        Self::new(move |_, start, end| {
            let (Some(start), Some(end)) = (start, end) else {
                return Ok(WeatherFetch::Current(Ok(current_payload(name, "2024-03-01 14:00"))));
            };
            let days = start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(|d| weather_requests_api::DailyWeather {
                    date: d,
                    result: Ok(history_payload(name, d)),
                })
                .collect();
            Ok(WeatherFetch::History(days))
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherFetcher for FakeFetcher {
    async fn fetch(
        &self,
        location: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<WeatherFetch, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(location, start_date, end_date)
    }
}

/// In-memory store that counts calls and can be told to fail
#[derive(Default)]
pub struct CountingStore {
    pub inner: InMemoryStore,
    pub calls: AtomicUsize,
    /// Fail the insert with this 1-based index
    pub fail_insert_at: Option<usize>,
    pub fail_update: bool,
    pub fail_delete: bool,
    pub inserts: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn insert(&self, record: NewWeatherRequest) -> Result<WeatherRequestRecord, StoreError> {
        self.tick();
        let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_insert_at == Some(n) {
            return Err(StoreError::Backend {
                status: 503,
                message: "database unavailable".to_string(),
            });
        }
        self.inner.insert(record).await
    }

    async fn list(&self, filters: &RecordFilters) -> Result<Vec<WeatherRequestRecord>, StoreError> {
        self.tick();
        self.inner.list(filters).await
    }

    async fn get(&self, id: i64) -> Result<WeatherRequestRecord, StoreError> {
        self.tick();
        self.inner.get(id).await
    }

    async fn update(
        &self,
        id: i64,
        patch: &WeatherRequestPatch,
    ) -> Result<WeatherRequestRecord, StoreError> {
        self.tick();
        if self.fail_update {
            return Err(StoreError::UpdateFailed);
        }
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.tick();
        if self.fail_delete {
            return Err(StoreError::DeleteFailed);
        }
        self.inner.delete(id).await
    }
}

/// Build the full application around the given fakes
pub fn app_with(
    fetcher: Arc<dyn WeatherFetcher>,
    store: Arc<dyn RecordStore>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let metrics = AppMetrics::new().unwrap();
    create_app(
        web::Data::new(AppState::new(fetcher, store)),
        web::Data::new(metrics),
        MetricsConfig::default(),
    )
}

/// One request received by the fake provider
#[derive(Debug, Clone)]
pub struct ProviderCall {
    pub path: String,
    pub params: HashMap<String, String>,
}

struct ProviderState {
    calls: Mutex<Vec<ProviderCall>>,
    failing_dates: Vec<String>,
    current_status: u16,
}

/// Handle to a running fake WeatherAPI server
pub struct FakeProvider {
    pub base_url: String,
    state: web::Data<ProviderState>,
}

impl FakeProvider {
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.calls.lock().unwrap().clone()
    }
}

async fn provider_endpoint(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    state: web::Data<ProviderState>,
) -> HttpResponse {
    let params = query.into_inner();
    state.calls.lock().unwrap().push(ProviderCall {
        path: req.path().to_string(),
        params: params.clone(),
    });

    if params.get("key").map(String::as_str) != Some(API_KEY) {
        return HttpResponse::Unauthorized().json(json!({"error": {"code": 2006}}));
    }

    match req.path() {
        "/v1/current.json" => {
            if state.current_status != 200 {
                let status = actix_web::http::StatusCode::from_u16(state.current_status).unwrap();
                return HttpResponse::build(status).json(json!({"error": {"code": 9999}}));
            }
            HttpResponse::Ok().json(current_payload("London", "2024-03-01 14:00"))
        }
        "/v1/history.json" => {
            let dt = params.get("dt").cloned().unwrap_or_default();
            if state.failing_dates.contains(&dt) {
                return HttpResponse::BadRequest().json(json!({"error": {"code": 1008}}));
            }
            let day = NaiveDate::parse_from_str(&dt, "%Y-%m-%d").unwrap();
            HttpResponse::Ok().json(history_payload("London", day))
        }
        _ => HttpResponse::NotFound().finish(),
    }
}

/// Start a fake WeatherAPI that fails history calls for `failing_dates`
/// and answers current calls with `current_status`
pub fn spawn_fake_provider(failing_dates: &[&str], current_status: u16) -> FakeProvider {
    let state = web::Data::new(ProviderState {
        calls: Mutex::new(Vec::new()),
        failing_dates: failing_dates.iter().map(|d| d.to_string()).collect(),
        current_status,
    });

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .default_service(web::to(provider_endpoint))
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    actix_web::rt::spawn(server);

    FakeProvider {
        base_url: format!("http://127.0.0.1:{port}/v1"),
        state,
    }
}

struct PostgrestState {
    rows: Mutex<Vec<Value>>,
    last_id: AtomicUsize,
    fail_deletes: bool,
}

/// Handle to a running fake PostgREST table
pub struct FakePostgrest {
    pub url: String,
    state: web::Data<PostgrestState>,
}

impl FakePostgrest {
    pub fn rows(&self) -> Vec<Value> {
        self.state.rows.lock().unwrap().clone()
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Split `col=eq.value` query pairs into equality filters
fn eq_filters(params: &HashMap<String, String>) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(k, _)| k.as_str() != "select")
        .filter_map(|(k, v)| v.strip_prefix("eq.").map(|v| (k.clone(), v.to_string())))
        .collect()
}

fn row_matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters
        .iter()
        .all(|(k, v)| row.get(k).map(render).as_deref() == Some(v.as_str()))
}

async fn postgrest_table(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
    state: web::Data<PostgrestState>,
) -> HttpResponse {
    let bearer = format!("Bearer {STORE_KEY}");
    let authorized = req.headers().get("apikey").and_then(|v| v.to_str().ok()) == Some(STORE_KEY)
        && req.headers().get("authorization").and_then(|v| v.to_str().ok())
            == Some(bearer.as_str());
    if !authorized {
        return HttpResponse::Unauthorized().json(json!({"message": "Invalid API key"}));
    }

    let filters = eq_filters(&query);
    let mut rows = state.rows.lock().unwrap();

    match req.method().as_str() {
        "POST" => {
            let mut row: Value = serde_json::from_slice(&body).unwrap();
            let id = state.last_id.fetch_add(1, Ordering::SeqCst) + 1;
            row["id"] = json!(id);
            row["created_at"] = json!("2024-03-01T14:05:00+00:00");
            rows.push(row.clone());
            HttpResponse::Created().json(vec![row])
        }
        "GET" => {
            let matched: Vec<Value> = rows
                .iter()
                .filter(|row| row_matches(row, &filters))
                .cloned()
                .collect();
            HttpResponse::Ok().json(matched)
        }
        "PATCH" => {
            let patch: Value = serde_json::from_slice(&body).unwrap();
            let mut updated = Vec::new();
            for row in rows.iter_mut().filter(|row| row_matches(row, &filters)) {
                if let (Some(row), Some(patch)) = (row.as_object_mut(), patch.as_object()) {
                    for (k, v) in patch {
                        row.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
            HttpResponse::Ok().json(updated)
        }
        "DELETE" => {
            if state.fail_deletes {
                return HttpResponse::InternalServerError().json(json!({"message": "boom"}));
            }
            rows.retain(|row| !row_matches(row, &filters));
            HttpResponse::NoContent().finish()
        }
        _ => HttpResponse::MethodNotAllowed().finish(),
    }
}

/// Start a fake PostgREST server exposing `/rest/v1/weather_requests`
pub fn spawn_fake_postgrest(fail_deletes: bool) -> FakePostgrest {
    let state = web::Data::new(PostgrestState {
        rows: Mutex::new(Vec::new()),
        last_id: AtomicUsize::new(0),
        fail_deletes,
    });

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .route("/rest/v1/weather_requests", web::to(postgrest_table))
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    actix_web::rt::spawn(server);

    FakePostgrest {
        url: format!("http://127.0.0.1:{port}"),
        state,
    }
}
