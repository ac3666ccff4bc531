//! Categorical label encoders recovered from the artifact

use crate::error::EncodeError;
use anyhow::{bail, Context, Result};
use std::collections::HashMap;

/// Categorical features the model was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalFeature {
    FuelType,
    SellerType,
    Transmission,
}

impl CategoricalFeature {
    pub const ALL: [CategoricalFeature; 3] = [
        CategoricalFeature::FuelType,
        CategoricalFeature::SellerType,
        CategoricalFeature::Transmission,
    ];

    /// Key of this feature's encoder in the artifact
    pub fn artifact_key(&self) -> &'static str {
        match self {
            CategoricalFeature::FuelType => "Fuel_Type",
            CategoricalFeature::SellerType => "Seller_Type",
            CategoricalFeature::Transmission => "Transmission",
        }
    }
}

/// Fixed, ordered vocabulary mapping labels to training codes.
///
/// A label's code is its position in the vocabulary.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Build an encoder from the ordered classes stored in the artifact
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            bail!("vocabulary is empty");
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), code).is_some() {
                bail!("vocabulary contains duplicate label {:?}", label);
            }
        }

        Ok(Self { classes, codes })
    }

    /// Labels in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Map a label to its training code
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    /// Map a training code back to its label
    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}

/// The three encoders the model needs
#[derive(Debug, Clone)]
pub struct EncoderSet {
    fuel_type: LabelEncoder,
    seller_type: LabelEncoder,
    transmission: LabelEncoder,
}

impl EncoderSet {
    /// Build the set from artifact vocabularies keyed by feature name.
    ///
    /// Every categorical feature must be present; extra keys are ignored.
    pub fn from_vocabularies(mut vocabularies: HashMap<String, Vec<String>>) -> Result<Self> {
        let mut take = |feature: CategoricalFeature| -> Result<LabelEncoder> {
            let key = feature.artifact_key();
            let classes = vocabularies
                .remove(key)
                .with_context(|| format!("label encoder for {} missing from artifact", key))?;
            LabelEncoder::new(classes).with_context(|| format!("invalid label encoder for {}", key))
        };

        Ok(Self {
            fuel_type: take(CategoricalFeature::FuelType)?,
            seller_type: take(CategoricalFeature::SellerType)?,
            transmission: take(CategoricalFeature::Transmission)?,
        })
    }

    pub fn get(&self, feature: CategoricalFeature) -> &LabelEncoder {
        match feature {
            CategoricalFeature::FuelType => &self.fuel_type,
            CategoricalFeature::SellerType => &self.seller_type,
            CategoricalFeature::Transmission => &self.transmission,
        }
    }

    /// Options offered by the form for a feature
    pub fn vocabulary(&self, feature: CategoricalFeature) -> &[String] {
        self.get(feature).classes()
    }

    /// Encode a label for a feature
    pub fn encode(&self, feature: CategoricalFeature, label: &str) -> Result<usize, EncodeError> {
        self.get(feature).transform(label).ok_or_else(|| EncodeError {
            feature: feature.artifact_key().to_string(),
            label: label.to_string(),
        })
    }
}
