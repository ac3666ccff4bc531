//! Error types for the prediction path.
//!
//! Startup failures (configuration, artifact loading) are reported through
//! `anyhow` and terminate the process. The types here cover what can go
//! wrong while serving a single prediction request.

use thiserror::Error;

/// A categorical label could not be mapped to a training code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("y contains previously unseen label for {feature}: {label:?}")]
pub struct EncodeError {
    pub feature: String,
    pub label: String,
}

/// Failure inside a regression model during inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("X has {actual} features, but {model} is expecting {expected} features as input")]
    FeatureCountMismatch {
        model: String,
        expected: usize,
        actual: usize,
    },

    #[error("tree {tree} is malformed: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("model produced a non-finite prediction ({0})")]
    NonFiniteOutput(f64),

    #[error("model produced no output")]
    EmptyOutput,

    #[error("inference runtime error: {0}")]
    Runtime(String),
}

/// The two error kinds a prediction request can surface to the user
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// One or more fields failed numeric coercion or encoding; the model
    /// was not called
    #[error("invalid input in fields: {}", .fields.join(", "))]
    InvalidInput { fields: Vec<String> },

    /// The model failed while computing the prediction
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl PredictionError {
    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::InvalidInput { .. } => "invalid_input",
            PredictionError::Model(_) => "prediction",
        }
    }
}
