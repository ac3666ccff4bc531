//! User-facing messages for prediction outcomes

use crate::error::PredictionError;

/// Currency symbol shown in front of predicted prices
pub const CURRENCY_SYMBOL: &str = "₹";

/// Unit the model predicts in
pub const PRICE_UNIT: &str = "lakhs";

/// Shown when any field fails numeric coercion
pub const INVALID_INPUT_MESSAGE: &str =
    "❌ Invalid input detected. Please fill all fields with valid values.";

/// Message shown after a successful prediction, rounded to two decimals
pub fn success_message(price: f64) -> String {
    format!(
        "✅ Estimated Selling Price: {} {:.2} {}",
        CURRENCY_SYMBOL, price, PRICE_UNIT
    )
}

/// Message shown for a failed prediction
pub fn error_message(error: &PredictionError) -> String {
    match error {
        PredictionError::InvalidInput { .. } => INVALID_INPUT_MESSAGE.to_string(),
        PredictionError::Model(e) => format!("❌ Prediction error: {}", e),
    }
}

/// Notice rendered under the form
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    /// Build the notice for a prediction outcome
    pub fn from_outcome(outcome: &Result<f64, PredictionError>) -> Self {
        match outcome {
            Ok(price) => Notice::Success(success_message(*price)),
            Err(e) => Notice::Error(error_message(e)),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }

    /// CSS class of the notice box
    pub fn css_class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "notice success",
            Notice::Error(_) => "notice error",
        }
    }
}
