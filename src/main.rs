//! Car Price Predictor - Main Entry Point
//!
//! Loads the model artifact once, then serves the prediction form over HTTP.

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use car_price_predictor::{
    config::{AppConfig, LoggingConfig},
    metrics::MetricsReporter,
    models::inference::PricePredictor,
    server::{self, AppState},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &LoggingConfig) -> Result<()> {
    // RUST_LOG takes precedence over the configured level
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive(format!("car_price_predictor={}", config.level).parse()?),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Car Price Predictor");

    // Artifact problems are fatal at startup
    let predictor = PricePredictor::load(&config.artifact).with_context(|| {
        format!(
            "Failed to load model artifact {}",
            config.artifact.path.display()
        )
    })?;

    let state = web::Data::new(AppState::new(predictor));
    let metrics = state.metrics.clone();

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        actix_web::rt::spawn(reporter.start());
    }

    let (host, port) = config.bind_address();
    info!(
        host = %host,
        port = port,
        workers = config.server.workers,
        "Serving prediction form"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(server::configure)
    })
    .workers(config.server.workers.max(1))
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {}:{}", host, port))?
    .run()
    .await?;

    info!("Car Price Predictor shutting down...");
    metrics.print_summary();

    Ok(())
}
