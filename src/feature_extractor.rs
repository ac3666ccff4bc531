//! Feature extraction for car price model inference.
//!
//! Turns submitted car details into the numeric row the model was trained
//! on. Column order comes from the artifact's `feature_columns`.

use crate::error::PredictionError;
use crate::models::encoder::{CategoricalFeature, EncoderSet};
use crate::types::car::{CarDetails, InputValue};
use anyhow::{bail, Result};
use serde::Serialize;

/// Columns the model knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    PresentPrice,
    KmsDriven,
    Owner,
    FuelType,
    SellerType,
    Transmission,
    CarAge,
}

impl FeatureColumn {
    /// Training column order of the reference model
    pub const ALL: [FeatureColumn; 7] = [
        FeatureColumn::PresentPrice,
        FeatureColumn::KmsDriven,
        FeatureColumn::Owner,
        FeatureColumn::FuelType,
        FeatureColumn::SellerType,
        FeatureColumn::Transmission,
        FeatureColumn::CarAge,
    ];

    /// Column name used in the artifact
    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::PresentPrice => "Present_Price",
            FeatureColumn::KmsDriven => "Kms_Driven",
            FeatureColumn::Owner => "Owner",
            FeatureColumn::FuelType => "Fuel_Type",
            FeatureColumn::SellerType => "Seller_Type",
            FeatureColumn::Transmission => "Transmission",
            FeatureColumn::CarAge => "Car_Age",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn categorical(&self) -> Option<CategoricalFeature> {
        match self {
            FeatureColumn::FuelType => Some(CategoricalFeature::FuelType),
            FeatureColumn::SellerType => Some(CategoricalFeature::SellerType),
            FeatureColumn::Transmission => Some(CategoricalFeature::Transmission),
            _ => None,
        }
    }

    fn numeric_input<'a>(&self, details: &'a CarDetails) -> Option<&'a InputValue> {
        match self {
            FeatureColumn::PresentPrice => details.present_price.as_ref(),
            FeatureColumn::KmsDriven => details.kms_driven.as_ref(),
            FeatureColumn::Owner => details.owner.as_ref(),
            FeatureColumn::CarAge => details.car_age.as_ref(),
            _ => None,
        }
    }

    fn label<'a>(&self, details: &'a CarDetails) -> Option<&'a str> {
        match self {
            FeatureColumn::FuelType => details.fuel_type.as_deref(),
            FeatureColumn::SellerType => details.seller_type.as_deref(),
            FeatureColumn::Transmission => details.transmission.as_deref(),
            _ => None,
        }
    }
}

/// One row of model input, values aligned with column names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<&'static str>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i])
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Feature extractor that transforms car details into model input rows.
pub struct FeatureExtractor {
    columns: Vec<FeatureColumn>,
}

impl FeatureExtractor {
    /// Create an extractor for the artifact's column order.
    ///
    /// The names must be a permutation of the seven known columns.
    pub fn new<I, S>(feature_columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns = Vec::with_capacity(FeatureColumn::ALL.len());
        for name in feature_columns {
            let name = name.as_ref();
            let Some(column) = FeatureColumn::from_name(name) else {
                bail!("unknown feature column {:?}", name);
            };
            if columns.contains(&column) {
                bail!("feature column {:?} listed twice", name);
            }
            columns.push(column);
        }

        if columns.len() != FeatureColumn::ALL.len() {
            let missing: Vec<&str> = FeatureColumn::ALL
                .iter()
                .filter(|c| !columns.contains(*c))
                .map(|c| c.name())
                .collect();
            bail!("feature columns missing: {}", missing.join(", "));
        }

        Ok(Self { columns })
    }

    /// Extractor using the reference column order
    pub fn canonical() -> Self {
        Self {
            columns: FeatureColumn::ALL.to_vec(),
        }
    }

    /// Extract the feature vector for one car.
    ///
    /// Every field is coerced to a number; if any of them comes out null the
    /// whole row is rejected and the offending column names are reported.
    pub fn extract(
        &self,
        details: &CarDetails,
        encoders: &EncoderSet,
    ) -> Result<FeatureVector, PredictionError> {
        let mut values = Vec::with_capacity(self.columns.len());
        let mut invalid = Vec::new();

        for column in &self.columns {
            let value = match column.categorical() {
                Some(feature) => column
                    .label(details)
                    .and_then(|label| encoders.encode(feature, label).ok())
                    .map(|code| code as f64),
                None => column.numeric_input(details).and_then(InputValue::to_numeric),
            };

            match value {
                Some(v) => values.push(v),
                None => invalid.push(column.name().to_string()),
            }
        }

        if !invalid.is_empty() {
            return Err(PredictionError::InvalidInput { fields: invalid });
        }

        Ok(FeatureVector {
            columns: self.feature_names(),
            values,
        })
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        self.columns.len()
    }

    /// Get feature names in model order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(FeatureColumn::name).collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::encoder::tests::sample_vocabularies;

    fn encoders() -> EncoderSet {
        EncoderSet::from_vocabularies(sample_vocabularies()).unwrap()
    }

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::canonical();
        let details = CarDetails::new(5.5, 30000, 0, "Petrol", "Dealer", "Manual", 3);

        let features = extractor.extract(&details, &encoders()).unwrap();

        assert_eq!(features.len(), 7);
        assert_eq!(features.values(), &[5.5, 30000.0, 0.0, 2.0, 0.0, 1.0, 3.0]);
        assert_eq!(features.columns(), extractor.feature_names().as_slice());
    }

    #[test]
    fn test_artifact_column_order_is_followed() {
        let extractor = FeatureExtractor::new(&[
            "Car_Age",
            "Present_Price",
            "Kms_Driven",
            "Owner",
            "Transmission",
            "Seller_Type",
            "Fuel_Type",
        ])
        .unwrap();
        let details = CarDetails::new(5.5, 30000, 1, "Diesel", "Individual", "Automatic", 9);

        let features = extractor.extract(&details, &encoders()).unwrap();

        assert_eq!(features.values(), &[9.0, 5.5, 30000.0, 1.0, 0.0, 1.0, 1.0]);
        assert_eq!(features.get("Fuel_Type"), Some(1.0));
        assert_eq!(features.get("Mileage"), None);
    }

    #[test]
    fn test_zero_boundary_values() {
        let details = CarDetails::new(0.0, 0, 0, "CNG", "Dealer", "Automatic", 0);
        let features = FeatureExtractor::canonical()
            .extract(&details, &encoders())
            .unwrap();
        assert!(features.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_non_numeric_fields_are_reported() {
        let mut details = CarDetails::new(5.5, 30000, 0, "Petrol", "Dealer", "Manual", 3);
        details.kms_driven = Some(InputValue::from("thirty thousand"));
        details.car_age = None;

        let err = FeatureExtractor::canonical()
            .extract(&details, &encoders())
            .unwrap_err();

        assert_eq!(
            err,
            PredictionError::InvalidInput {
                fields: vec!["Kms_Driven".to_string(), "Car_Age".to_string()]
            }
        );
    }

    #[test]
    fn test_unknown_label_is_invalid_input() {
        let details = CarDetails::new(5.5, 30000, 0, "Electric", "Dealer", "Manual", 3);
        let err = FeatureExtractor::canonical()
            .extract(&details, &encoders())
            .unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidInput {
                fields: vec!["Fuel_Type".to_string()]
            }
        );
    }

    #[test]
    fn test_missing_label_is_invalid_input() {
        let mut details = CarDetails::new(5.5, 30000, 0, "Petrol", "Dealer", "Manual", 3);
        details.seller_type = None;
        details.transmission = None;

        let err = FeatureExtractor::canonical()
            .extract(&details, &encoders())
            .unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidInput {
                fields: vec!["Seller_Type".to_string(), "Transmission".to_string()]
            }
        );
    }

    #[test]
    fn test_column_list_validation() {
        assert!(FeatureExtractor::new(&["Present_Price"]).is_err());
        assert!(FeatureExtractor::new(&[
            "Present_Price",
            "Kms_Driven",
            "Owner",
            "Fuel_Type",
            "Seller_Type",
            "Transmission",
            "Year",
        ])
        .is_err());
        assert!(FeatureExtractor::new(&[
            "Present_Price",
            "Present_Price",
            "Owner",
            "Fuel_Type",
            "Seller_Type",
            "Transmission",
            "Car_Age",
        ])
        .is_err());
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::default();
        assert_eq!(extractor.feature_count(), 7);
        assert_eq!(extractor.feature_names()[0], "Present_Price");
    }
}
