//! Car Price Predictor Library
//!
//! A single-page form that encodes car attributes, runs a pre-trained
//! regression model and shows the predicted resale price.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod presenter;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{ModelError, PredictionError};
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub use models::inference::{PricePrediction, PricePredictor};
pub use server::AppState;
pub use types::car::{CarDetails, InputValue};
