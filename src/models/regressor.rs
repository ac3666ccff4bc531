//! Regression model abstraction

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Anything that maps one feature row to a price.
///
/// Implementations are shared across actix workers and must tolerate
/// concurrent calls.
pub trait Regressor: Send + Sync {
    /// Human readable model name, used in logs and error messages
    fn name(&self) -> &str;

    /// Number of input features, when the model declares it
    fn n_features(&self) -> Option<usize>;

    /// Predict a single row
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError>;
}

/// Reject rows whose width differs from what the model expects
pub fn check_feature_count(model: &dyn Regressor, row: &[f64]) -> Result<(), ModelError> {
    match model.n_features() {
        Some(expected) if expected != row.len() => Err(ModelError::FeatureCountMismatch {
            model: model.name().to_string(),
            expected,
            actual: row.len(),
        }),
        _ => Ok(()),
    }
}

/// Ordinary linear model: `intercept + Σ coefficients[i] * x[i]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        "LinearRegressor"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        check_feature_count(self, row)?;

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum();

        Ok(self.intercept + dot)
    }
}
