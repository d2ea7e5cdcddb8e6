//! Weather request CRUD endpoint handlers.

use crate::{
    handlers::error::ApiError,
    models::{
        CreateWeatherRequest, ListRequestsQuery, RecordFilters, UpdateWeatherRequest,
        WeatherRequestPatch,
    },
    services::StoreError,
    state::AppState,
};
use actix_web::{Error, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use tracing::{info, warn};

/// Create weather request records
///
/// Fetches weather for the location (current conditions, or one day at a
/// time over an inclusive date range) and stores one record per payload.
#[api_v2_operation(
    summary = "Create Weather Request",
    description = "Fetches weather for a location and stores one record per day in range, or one record for current conditions when no range is given.",
    tags("Requests"),
    responses(
        (status = 201, description = "Records created"),
        (status = 400, description = "Missing location or malformed body"),
        (status = 404, description = "No weather data found for the given location and dates"),
        (status = 500, description = "Fetch or persistence failure")
    )
)]
pub async fn create_request(
    state: web::Data<AppState>,
    body: web::Json<CreateWeatherRequest>,
) -> Result<HttpResponse, Error> {
    let request = body.into_inner();
    info!(
        user_name = %request.user_name,
        location = %request.location_input,
        start_date = ?request.start_date,
        end_date = ?request.end_date,
        "Create weather request"
    );

    let records = state.requests.create(&request).await.map_err(|e| {
        warn!(user_name = %request.user_name, error = %e, "Create weather request failed");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Created().json(records))
}

/// List weather request records
#[api_v2_operation(
    summary = "List Weather Requests",
    description = "Returns records matching every filter in the optional `filters` JSON object, e.g. ?filters={\"user_name\":\"ada\"}.",
    tags("Requests"),
    responses(
        (status = 200, description = "Matching records"),
        (status = 400, description = "Malformed filters"),
        (status = 404, description = "No requests found")
    )
)]
pub async fn list_requests(
    state: web::Data<AppState>,
    query: web::Query<ListRequestsQuery>,
) -> Result<HttpResponse, Error> {
    let filters = match query.filters.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => RecordFilters::from_json(raw).map_err(ApiError::from)?,
        _ => RecordFilters::new(),
    };

    let records = state.store.list(&filters).await.map_err(ApiError::internal)?;
    if records.is_empty() {
        return Err(ApiError::NotFound("No requests found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(records))
}

/// Fetch a single weather request record
#[api_v2_operation(
    summary = "Get Weather Request",
    tags("Requests"),
    responses(
        (status = 200, description = "The record"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();

    let record = state.store.get(id).await.map_err(|e| {
        if matches!(e, StoreError::NotFound) {
            ApiError::NotFound(e.to_string())
        } else {
            ApiError::internal(e)
        }
    })?;

    Ok(HttpResponse::Ok().json(record))
}

/// Partially update a weather request record
#[api_v2_operation(
    summary = "Update Weather Request",
    description = "Applies only the supplied fields among location_input, start_date and end_date.",
    tags("Requests"),
    responses(
        (status = 200, description = "The updated record"),
        (status = 400, description = "No fields to update"),
        (status = 500, description = "Update failed")
    )
)]
pub async fn update_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateWeatherRequest>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();
    let patch = WeatherRequestPatch::from(body.into_inner());
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()).into());
    }

    let record = state
        .store
        .update(id, &patch)
        .await
        .map_err(ApiError::internal)?;
    info!(id, "Weather request updated");

    Ok(HttpResponse::Ok().json(record))
}

/// Delete a weather request record
#[api_v2_operation(
    summary = "Delete Weather Request",
    tags("Requests"),
    responses(
        (status = 204, description = "Deleted"),
        (status = 500, description = "Delete failed")
    )
)]
pub async fn delete_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();

    state.store.delete(id).await.map_err(ApiError::internal)?;
    info!(id, "Weather request deleted");

    Ok(HttpResponse::NoContent().finish())
}
