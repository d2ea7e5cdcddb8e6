//! Create flow: fetch weather, reshape each payload into a record, persist.

use crate::models::{CreateWeatherRequest, NewWeatherRequest, RecordType, WeatherRequestRecord};
use crate::services::store::{RecordStore, StoreError};
use crate::services::weather::{FetchError, WeatherFetch, WeatherFetcher};
use crate::utils::dates::{date_from_provider_timestamp, today};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a create request produced no records
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No weather data found for the given location and dates")]
    NoWeatherData,

    #[error("Failed to create any weather records")]
    NothingCreated,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A provider payload ready to be stored
struct Payload {
    record_type: RecordType,
    body: Value,
}

/// Orchestrates the fetcher and the store for `POST /requests`
pub struct WeatherRequestService {
    fetcher: Arc<dyn WeatherFetcher>,
    store: Arc<dyn RecordStore>,
}

impl WeatherRequestService {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>, store: Arc<dyn RecordStore>) -> Self {
        Self { fetcher, store }
    }

    /// Fetch and persist one record per returned payload, in fetch order.
    ///
    /// Provider failures are stored like any other payload, as
    /// `{"error": "<message>"}`. If an insert fails, records already inserted
    /// for this request are deleted again before the error is returned.
    pub async fn create(
        &self,
        request: &CreateWeatherRequest,
    ) -> Result<Vec<WeatherRequestRecord>, CreateError> {
        let fetched = self
            .fetcher
            .fetch(&request.location_input, request.start_date, request.end_date)
            .await?;
        debug!(
            location = %request.location_input,
            payloads = fetched.len(),
            "Weather fetch completed"
        );

        if fetched.is_empty() {
            return Err(CreateError::NoWeatherData);
        }

        let mut created = Vec::new();
        for payload in payloads(fetched) {
            let Value::Object(body) = payload.body else {
                continue;
            };
            let record = build_record(request, payload.record_type, body);

            match self.store.insert(record).await {
                Ok(stored) => created.push(stored),
                Err(e) => {
                    warn!(
                        user_name = %request.user_name,
                        error = %e,
                        inserted = created.len(),
                        "Insert failed, removing records created by this request"
                    );
                    self.roll_back(&created).await;
                    return Err(e.into());
                }
            }
        }

        if created.is_empty() {
            return Err(CreateError::NothingCreated);
        }

        info!(
            user_name = %request.user_name,
            records = created.len(),
            "Weather request records created"
        );
        Ok(created)
    }

    async fn roll_back(&self, created: &[WeatherRequestRecord]) {
        for record in created {
            if let Err(e) = self.store.delete(record.id).await {
                warn!(id = record.id, error = %e, "Could not remove record during rollback");
            }
        }
    }
}

/// Flatten a fetch into storable payloads, turning failures into error objects
fn payloads(fetched: WeatherFetch) -> Vec<Payload> {
    match fetched {
        WeatherFetch::Current(result) => vec![Payload {
            record_type: RecordType::Current,
            body: body_or_error(result),
        }],
        WeatherFetch::History(days) => days
            .into_iter()
            .map(|day| Payload {
                record_type: RecordType::History,
                body: body_or_error(day.result),
            })
            .collect(),
    }
}

fn body_or_error(result: Result<Value, FetchError>) -> Value {
    result.unwrap_or_else(|e| json!({ "error": e.to_string() }))
}

/// Reshape one provider payload into an insert
///
/// The record date is the date part of `current.last_updated`, else the
/// request's `start_date`, else today (UTC).
pub fn build_record(
    request: &CreateWeatherRequest,
    record_type: RecordType,
    data: Map<String, Value>,
) -> NewWeatherRequest {
    let location_input = data
        .get("location")
        .and_then(|location| location.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| request.location_input.clone());

    let date = data
        .get("current")
        .and_then(|current| current.get("last_updated"))
        .and_then(Value::as_str)
        .and_then(date_from_provider_timestamp)
        .or(request.start_date)
        .unwrap_or_else(today);

    NewWeatherRequest {
        user_name: request.user_name.clone(),
        location_input,
        date,
        record_type,
        data,
    }
}
