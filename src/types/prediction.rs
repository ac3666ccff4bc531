//! Prediction response returned by the JSON API

use crate::error::PredictionError;
use crate::presenter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Success,
    Error,
}

/// JSON body answered by `POST /api/predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Identifier of the request, also present in the logs
    pub request_id: String,

    pub status: PredictionStatus,

    /// The same message the form would display
    pub message: String,

    /// Predicted selling price in lakhs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_lakhs: Option<f64>,

    /// Feature vector submitted to the model, in artifact column order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<f64>>,

    /// "invalid_input" or "prediction" when status is error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,

    pub predicted_at: DateTime<Utc>,
}

impl PredictionResponse {
    /// Successful prediction
    pub fn success(request_id: String, price_lakhs: f64) -> Self {
        Self {
            request_id,
            status: PredictionStatus::Success,
            message: presenter::success_message(price_lakhs),
            price_lakhs: Some(price_lakhs),
            features: None,
            error_kind: None,
            predicted_at: Utc::now(),
        }
    }

    /// Failed prediction
    pub fn failure(request_id: String, error: &PredictionError) -> Self {
        Self {
            request_id,
            status: PredictionStatus::Error,
            message: presenter::error_message(error),
            price_lakhs: None,
            features: None,
            error_kind: Some(error.kind().to_string()),
            predicted_at: Utc::now(),
        }
    }

    /// Attach the feature vector the model saw
    pub fn with_features(mut self, features: Vec<f64>) -> Self {
        self.features = Some(features);
        self
    }
}
