//! HTTP surface: the prediction form and its JSON counterparts

pub mod form;
pub mod handlers;

use crate::metrics::PredictionMetrics;
use crate::models::inference::PricePredictor;
use actix_web::web;
use std::sync::Arc;

/// State shared by all workers
pub struct AppState {
    pub predictor: PricePredictor,
    pub metrics: Arc<PredictionMetrics>,
}

impl AppState {
    pub fn new(predictor: PricePredictor) -> Self {
        Self {
            predictor,
            metrics: Arc::new(PredictionMetrics::new()),
        }
    }
}

/// Register all routes and the body extractor error handlers
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error))
        .app_data(web::FormConfig::default().error_handler(handlers::form_error))
        .route("/", web::get().to(handlers::index))
        .route("/predict", web::post().to(handlers::predict_form))
        .route("/api/predict", web::post().to(handlers::predict_json))
        .route("/api/vocabularies", web::get().to(handlers::vocabularies))
        .route("/health", web::get().to(handlers::health))
        .route("/metrics", web::get().to(handlers::metrics));
}
