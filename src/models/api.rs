//! Request and response models for the HTTP endpoints.

use crate::models::record::WeatherRequestPatch;
use chrono::NaiveDate;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the welcome endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Body of `POST /requests`
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct CreateWeatherRequest {
    pub user_name: String,
    /// Free-form location understood by the provider (city, ZIP, "lat,lon")
    pub location_input: String,
    /// First day of a historical range (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Last day of a historical range (inclusive)
    pub end_date: Option<NaiveDate>,
}

/// Body of `PATCH /requests/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct UpdateWeatherRequest {
    pub location_input: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<UpdateWeatherRequest> for WeatherRequestPatch {
    fn from(update: UpdateWeatherRequest) -> Self {
        Self {
            location_input: update.location_input,
            start_date: update.start_date,
            end_date: update.end_date,
        }
    }
}

/// Query parameters for `GET /requests`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct ListRequestsQuery {
    /// Equality filters as a JSON object, e.g. `{"user_name": "ada"}`
    pub filters: Option<String>,
}
