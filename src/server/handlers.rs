//! HTTP handlers

use crate::error::PredictionError;
use crate::models::encoder::CategoricalFeature;
use crate::models::inference::PricePrediction;
use crate::presenter::Notice;
use crate::server::form::{render_page, FormState, CAR_AGE_RANGE, MAX_OWNERS};
use crate::server::AppState;
use crate::types::car::CarDetails;
use crate::types::prediction::PredictionResponse;
use actix_web::error::{InternalError, JsonPayloadError, UrlencodedError};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const HTML: &str = "text/html; charset=utf-8";

/// Run one prediction, recording metrics and logging the outcome
fn run_prediction(
    state: &AppState,
    details: &CarDetails,
    request_id: &str,
) -> Result<PricePrediction, PredictionError> {
    let start_time = Instant::now();
    let outcome = state.predictor.predict(details);
    let elapsed = start_time.elapsed();

    state.metrics.record(&outcome, elapsed);

    match &outcome {
        Ok(prediction) => info!(
            request_id = %request_id,
            price = prediction.price,
            latency_us = elapsed.as_micros() as u64,
            "Prediction served"
        ),
        Err(e) => warn!(
            request_id = %request_id,
            error_kind = e.kind(),
            error = %e,
            latency_us = elapsed.as_micros() as u64,
            "Prediction rejected"
        ),
    }

    outcome
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Count and log a body the extractor could not read
fn reject_body(req: &HttpRequest, reason: &dyn Display) -> (String, PredictionError) {
    let request_id = new_request_id();
    let error = PredictionError::InvalidInput { fields: Vec::new() };

    if let Some(state) = req.app_data::<web::Data<AppState>>() {
        state.metrics.record(&Err::<(), _>(error.clone()), Duration::ZERO);
    }
    warn!(
        request_id = %request_id,
        path = req.path(),
        error = %reason,
        "Request body rejected"
    );

    (request_id, error)
}

/// Malformed JSON bodies answer like any other invalid input
pub fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let (request_id, error) = reject_body(req, &err);
    let response = HttpResponse::UnprocessableEntity()
        .json(PredictionResponse::failure(request_id, &error));
    InternalError::from_response(err, response).into()
}

/// Unreadable form submissions re-render the form with the invalid-input notice
pub fn form_error(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    let (_, error) = reject_body(req, &err);
    let response = match req.app_data::<web::Data<AppState>>() {
        Some(state) => {
            let notice = Notice::from_outcome(&Err(error));
            HttpResponse::Ok().content_type(HTML).body(render_page(
                &state.predictor,
                &FormState::initial(&state.predictor),
                Some(&notice),
            ))
        }
        None => HttpResponse::BadRequest().finish(),
    };
    InternalError::from_response(err, response).into()
}

/// `GET /`: the form awaiting a trigger
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let form = FormState::initial(&state.predictor);
    HttpResponse::Ok()
        .content_type(HTML)
        .body(render_page(&state.predictor, &form, None))
}

/// `POST /predict`: form submission, re-renders the page with the result
pub async fn predict_form(
    state: web::Data<AppState>,
    form: web::Form<CarDetails>,
) -> HttpResponse {
    let details = form.into_inner();
    let request_id = new_request_id();

    let outcome = run_prediction(&state, &details, &request_id).map(|p| p.price);
    let notice = Notice::from_outcome(&outcome);

    HttpResponse::Ok()
        .content_type(HTML)
        .body(render_page(
            &state.predictor,
            &FormState::from_details(&details),
            Some(&notice),
        ))
}

/// `POST /api/predict`: JSON prediction
pub async fn predict_json(
    state: web::Data<AppState>,
    body: web::Json<CarDetails>,
) -> HttpResponse {
    let details = body.into_inner();
    let request_id = new_request_id();

    match run_prediction(&state, &details, &request_id) {
        Ok(prediction) => HttpResponse::Ok().json(
            PredictionResponse::success(request_id, prediction.price)
                .with_features(prediction.features.into_values()),
        ),
        Err(e) => {
            let status = match e {
                PredictionError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PredictionError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            HttpResponse::build(status).json(PredictionResponse::failure(request_id, &e))
        }
    }
}

#[derive(Serialize)]
struct VocabulariesResponse<'a> {
    model: &'a str,
    feature_columns: Vec<&'static str>,
    vocabularies: BTreeMap<&'static str, &'a [String]>,
    owner_options: Vec<u8>,
    car_age_range: [u8; 2],
}

/// `GET /api/vocabularies`: options the form offers
pub async fn vocabularies(state: web::Data<AppState>) -> HttpResponse {
    let predictor = &state.predictor;
    let vocabularies = CategoricalFeature::ALL
        .into_iter()
        .map(|feature| (feature.artifact_key(), predictor.vocabulary(feature)))
        .collect();

    HttpResponse::Ok().json(VocabulariesResponse {
        model: predictor.model_name(),
        feature_columns: predictor.feature_names(),
        vocabularies,
        owner_options: (0..=MAX_OWNERS).collect(),
        car_age_range: [CAR_AGE_RANGE.0, CAR_AGE_RANGE.1],
    })
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// `GET /metrics`
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.metrics.snapshot())
}
