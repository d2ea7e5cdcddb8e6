use actix_web::{HttpServer, web};
use std::process::ExitCode;
use weather_requests_api::{
    AppConfig, AppMetrics, AppState, LogConfig, create_app, init_tracing,
};

#[actix_web::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the variables may come from the environment
    let _ = dotenvy::dotenv();

    if let Err(e) = init_tracing(&LogConfig::from_env()) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let metrics = AppMetrics::new()?;
    let state = web::Data::new(AppState::from_config(&config, &metrics)?);
    let metrics = web::Data::new(metrics);
    let metrics_config = config.metrics.clone();

    let (host, port) = config.server.socket_addr();
    tracing::info!(
        host = %host,
        port,
        store = config.store.backend_name(),
        weather_api = %config.weather.base_url,
        "Starting weather requests API"
    );

    HttpServer::new(move || create_app(state.clone(), metrics.clone(), metrics_config.clone()))
        .bind((host.as_str(), port))?
        .run()
        .await?;

    Ok(())
}
