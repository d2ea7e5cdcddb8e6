//! OpenAPI specification generation and app factory.

use crate::{
    config::MetricsConfig,
    handlers::{
        create_request, delete_request, error::ApiError, get_metrics, get_request, health, home,
        list_requests, update_request, version,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    services::AppMetrics,
    state::AppState,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Where the generated OpenAPI v2 document is served
pub const SPEC_PATH: &str = "/api/spec/v2";

/// Creates the OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Weather App API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "API for managing weather requests and fetching weather data.\n\n\
                A weather request stores the raw WeatherAPI.com response for a location:\n\
                - without dates, one record with the current conditions (`type` = `current`)\n\
                - with `start_date` and `end_date`, one record per day in the inclusive range (`type` = `history`)\n\
                \n\
                Errors are returned as `{\"detail\": \"<message>\"}`."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application with every route and middleware installed.
///
/// Shared by `main` and the integration tests so both exercise the same stack.
pub fn create_app(
    state: actix_web::web::Data<AppState>,
    metrics: actix_web::web::Data<AppMetrics>,
    metrics_config: MetricsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = actix_web::web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());
    let query_config = actix_web::web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());
    let path_config = actix_web::web::PathConfig::default()
        .error_handler(|err, _req| ApiError::NotFound(err.to_string()).into());

    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(json_config)
        .app_data(query_config)
        .app_data(path_config)
        .app_data(state)
        .app_data(metrics)
        .app_data(actix_web::web::Data::new(metrics_config))
        .service(web::resource("/").route(web::get().to(home)))
        .service(
            web::resource("/requests")
                .route(web::post().to(create_request))
                .route(web::get().to(list_requests)),
        )
        .service(
            web::resource("/requests/{id}")
                .route(web::get().to(get_request))
                .route(web::patch().to(update_request))
                .route(web::delete().to(delete_request)),
        )
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at(SPEC_PATH)
        .build()
}
