//! End-to-end tests of the prediction form and JSON API

use actix_web::{http::StatusCode, test, web, App};
use car_price_predictor::models::loader::ArtifactLoader;
use car_price_predictor::server::{self, AppState};
use car_price_predictor::PricePredictor;
use serde_json::{json, Value};
use std::io::Write;

// 0.5 + 0.5*5.5 - 0.00001*30000 + 0.1*code(Petrol) + 0.4*code(Manual) - 0.25*3 = 2.8
fn artifact_json() -> Value {
    json!({
        "feature_columns": ["Present_Price", "Kms_Driven", "Owner", "Fuel_Type",
                            "Seller_Type", "Transmission", "Car_Age"],
        "label_encoders": {
            "Fuel_Type": {"classes": ["CNG", "Diesel", "Petrol"]},
            "Seller_Type": {"classes": ["Dealer", "Individual"]},
            "Transmission": {"classes": ["Automatic", "Manual"]}
        },
        "model": {
            "kind": "linear",
            "intercept": 0.5,
            "coefficients": [0.5, -0.00001, -0.2, 0.1, -0.3, 0.4, -0.25]
        }
    })
}

fn load_predictor(artifact: &Value) -> PricePredictor {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", artifact).unwrap();
    let artifact = ArtifactLoader::new().load(file.path()).unwrap();
    PricePredictor::from_artifact(artifact)
}

fn reference_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("present_price", "5.5"),
        ("kms_driven", "30000"),
        ("owner", "0"),
        ("fuel_type", "Petrol"),
        ("seller_type", "Dealer"),
        ("transmission", "Manual"),
        ("car_age", "3"),
    ]
}

macro_rules! app {
    ($artifact:expr) => {{
        let state = web::Data::new(AppState::new(load_predictor(&$artifact)));
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(server::configure),
        )
        .await;
        (app, state)
    }};
}

#[actix_web::test]
async fn test_index_renders_form() {
    let (app, _) = app!(artifact_json());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Car Selling Price Predictor"));
    assert!(body.contains("<option value=\"Diesel\""));
    assert!(body.contains("Predict Selling Price"));
    assert!(!body.contains("Estimated Selling Price"));
}

#[actix_web::test]
async fn test_form_submission_shows_price() {
    let (app, state) = app!(artifact_json());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_form(reference_form())
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("✅ Estimated Selling Price: ₹ 2.80 lakhs"));
    assert!(body.contains("<option value=\"Petrol\" selected>"));
    assert_eq!(state.metrics.snapshot().successes, 1);
}

#[actix_web::test]
async fn test_non_numeric_field_shows_invalid_input() {
    let (app, state) = app!(artifact_json());

    let mut form = reference_form();
    form[1] = ("kms_driven", "lots");
    let req = test::TestRequest::post().uri("/predict").set_form(form).to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("❌ Invalid input detected. Please fill all fields with valid values."));
    assert!(!body.contains("Estimated Selling Price"));

    let snapshot = state.metrics.snapshot();
    assert_eq!(snapshot.input_errors, 1);
    assert_eq!(snapshot.successes, 0);
}

#[actix_web::test]
async fn test_zero_boundary_predicts() {
    let (app, _) = app!(artifact_json());

    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(json!({
            "present_price": 0.0, "kms_driven": 0, "owner": 0,
            "fuel_type": "CNG", "seller_type": "Dealer", "transmission": "Automatic",
            "car_age": 0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "✅ Estimated Selling Price: ₹ 0.50 lakhs");
}

#[actix_web::test]
async fn test_json_prediction_is_idempotent() {
    let (app, _) = app!(artifact_json());
    let payload = json!({
        "present_price": 5.5, "kms_driven": 30000, "owner": 0,
        "fuel_type": "Petrol", "seller_type": "Dealer", "transmission": "Manual",
        "car_age": 3
    });

    let mut messages = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(&payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["features"], json!([5.5, 30000.0, 0.0, 2.0, 0.0, 1.0, 3.0]));
        messages.push(body["message"].clone());
    }

    assert_eq!(messages[0], messages[1]);
    assert_eq!(messages[0], "✅ Estimated Selling Price: ₹ 2.80 lakhs");
}

#[actix_web::test]
async fn test_json_missing_field_is_unprocessable() {
    let (app, _) = app!(artifact_json());

    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(json!({
            "present_price": 5.5, "owner": 0,
            "fuel_type": "Petrol", "seller_type": "Dealer", "transmission": "Manual",
            "car_age": 3
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_kind"], "invalid_input");
}

#[actix_web::test]
async fn test_json_non_numeric_value_is_unprocessable() {
    let (app, state) = app!(artifact_json());

    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(json!({
            "present_price": 5.5, "kms_driven": true, "owner": 0,
            "fuel_type": "Petrol", "seller_type": "Dealer", "transmission": "Manual",
            "car_age": 3
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_kind"], "invalid_input");
    assert_eq!(
        body["message"],
        "❌ Invalid input detected. Please fill all fields with valid values."
    );
    assert_eq!(state.metrics.snapshot().input_errors, 1);
}

#[actix_web::test]
async fn test_json_null_or_numeric_label_is_unprocessable() {
    let (app, _) = app!(artifact_json());

    for fuel_type in [Value::Null, json!(7), json!(["Petrol"])] {
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({
                "present_price": 5.5, "kms_driven": 30000, "owner": 0,
                "fuel_type": fuel_type, "seller_type": "Dealer", "transmission": "Manual",
                "car_age": 3
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_kind"], "invalid_input");
    }
}

#[actix_web::test]
async fn test_malformed_json_body_is_unprocessable() {
    let (app, state) = app!(artifact_json());

    let req = test::TestRequest::post()
        .uri("/api/predict")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"present_price\": 5.5,")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "❌ Invalid input detected. Please fill all fields with valid values."
    );
    assert_eq!(state.metrics.snapshot().input_errors, 1);
}

#[actix_web::test]
async fn test_repeated_form_key_rerenders_form() {
    let (app, state) = app!(artifact_json());

    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload(
            "present_price=5.5&kms_driven=30000&owner=0&owner=1&fuel_type=Petrol\
             &seller_type=Dealer&transmission=Manual&car_age=3",
        )
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<form method=\"post\" action=\"/predict\">"));
    assert!(body.contains("❌ Invalid input detected. Please fill all fields with valid values."));
    assert!(!body.contains("Estimated Selling Price"));
    assert_eq!(state.metrics.snapshot().input_errors, 1);
}

#[actix_web::test]
async fn test_model_failure_is_reported_not_crashed() {
    let mut artifact = artifact_json();
    artifact["model"]["coefficients"] = json!([1.0, 1.0, 1.0]);
    let (app, state) = app!(artifact);

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_form(reference_form())
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains(
        "❌ Prediction error: X has 7 features, but LinearRegressor is expecting 3 features as input"
    ));
    assert_eq!(state.metrics.snapshot().prediction_errors, 1);

    // the service keeps answering
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_vocabularies_endpoint() {
    let (app, _) = app!(artifact_json());

    let req = test::TestRequest::get().uri("/api/vocabularies").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["vocabularies"]["Fuel_Type"], json!(["CNG", "Diesel", "Petrol"]));
    assert_eq!(body["feature_columns"].as_array().unwrap().len(), 7);
    assert_eq!(body["owner_options"], json!([0, 1, 2, 3]));
    assert_eq!(body["car_age_range"], json!([0, 25]));
}

#[actix_web::test]
async fn test_metrics_endpoint() {
    let (app, _) = app!(artifact_json());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_form(reference_form())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["requests"], 1);
    assert_eq!(body["successes"], 1);
}
