//! Car price inference engine

use crate::config::ArtifactConfig;
use crate::error::{ModelError, PredictionError};
use crate::feature_extractor::{FeatureExtractor, FeatureVector};
use crate::models::encoder::{CategoricalFeature, EncoderSet};
use crate::models::loader::{ArtifactLoader, LoadedArtifact};
use crate::models::regressor::Regressor;
use crate::types::car::CarDetails;
use anyhow::Result;
use tracing::{debug, info};

/// Result of a successful prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PricePrediction {
    /// Predicted selling price in lakhs
    pub price: f64,
    /// Row the model was called with
    pub features: FeatureVector,
}

/// Encodes car details and runs the loaded regressor
pub struct PricePredictor {
    regressor: Box<dyn Regressor>,
    encoders: EncoderSet,
    extractor: FeatureExtractor,
}

impl PricePredictor {
    /// Load the artifact named in the configuration
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        let artifact = ArtifactLoader::with_threads(config.onnx_threads).load(&config.path)?;

        info!(
            model = %artifact.regressor.name(),
            features = artifact.extractor.feature_count(),
            "Price predictor initialized"
        );

        Ok(Self::from_artifact(artifact))
    }

    pub fn from_artifact(artifact: LoadedArtifact) -> Self {
        Self::new(artifact.regressor, artifact.encoders, artifact.extractor)
    }

    pub fn new(
        regressor: Box<dyn Regressor>,
        encoders: EncoderSet,
        extractor: FeatureExtractor,
    ) -> Self {
        Self {
            regressor,
            encoders,
            extractor,
        }
    }

    /// Name of the loaded model
    pub fn model_name(&self) -> &str {
        self.regressor.name()
    }

    /// Valid labels for a categorical feature
    pub fn vocabulary(&self, feature: CategoricalFeature) -> &[String] {
        self.encoders.vocabulary(feature)
    }

    /// Feature names in model order
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.extractor.feature_names()
    }

    /// Build the feature row without calling the model
    pub fn feature_vector(&self, details: &CarDetails) -> Result<FeatureVector, PredictionError> {
        self.extractor.extract(details, &self.encoders)
    }

    /// Predict the selling price of one car.
    ///
    /// The model is only called once every field has been coerced to a
    /// number.
    pub fn predict(&self, details: &CarDetails) -> Result<PricePrediction, PredictionError> {
        let features = self.feature_vector(details)?;

        let price = self.regressor.predict(features.values())?;
        if !price.is_finite() {
            return Err(ModelError::NonFiniteOutput(price).into());
        }

        debug!(
            model = %self.regressor.name(),
            features = ?features.values(),
            price = price,
            "Prediction complete"
        );

        Ok(PricePrediction { price, features })
    }
}
