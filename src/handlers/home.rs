//! Welcome endpoint handler.

use crate::models::WelcomeResponse;
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

pub const WELCOME_MESSAGE: &str = "Welcome to the Weather App API! Use the endpoints to manage weather requests and fetch weather data.";

#[api_v2_operation(
    summary = "Welcome Endpoint",
    tags("Home"),
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    )
)]
pub async fn home() -> Result<web::Json<WelcomeResponse>, Error> {
    Ok(web::Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    }))
}
