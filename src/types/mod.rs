//! Type definitions for the car price predictor

pub mod car;
pub mod prediction;

pub use car::{CarDetails, InputValue};
pub use prediction::{PredictionResponse, PredictionStatus};
