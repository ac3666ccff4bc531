//! Raw car details as submitted by the user

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single submitted value for a numeric field.
///
/// JSON clients send numbers, HTML forms send text. Both are kept as-is
/// until the predictor coerces them. Anything else (booleans, arrays,
/// objects) is kept as `Other` and coerces to null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl InputValue {
    /// Coerce to a finite number, `None` standing in for null
    pub fn to_numeric(&self) -> Option<f64> {
        let value = match self {
            InputValue::Number(n) => *n,
            InputValue::Text(s) => s.trim().parse::<f64>().ok()?,
            InputValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Text shown back in the form widget
    pub fn display(&self) -> String {
        match self {
            InputValue::Number(n) => n.to_string(),
            InputValue::Text(s) => s.clone(),
            InputValue::Other(v) => v.to_string(),
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

/// Accept any value for a label; only strings can match a vocabulary
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(label) => Some(label),
        _ => None,
    })
}

/// Car attributes collected by the form, before encoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarDetails {
    /// Current ex-showroom price (lakhs)
    #[serde(default)]
    pub present_price: Option<InputValue>,

    /// Kilometers driven
    #[serde(default)]
    pub kms_driven: Option<InputValue>,

    /// Number of previous owners (0-3)
    #[serde(default)]
    pub owner: Option<InputValue>,

    /// Fuel type label (e.g. "Petrol")
    #[serde(default, deserialize_with = "lenient_label")]
    pub fuel_type: Option<String>,

    /// Seller type label (e.g. "Dealer")
    #[serde(default, deserialize_with = "lenient_label")]
    pub seller_type: Option<String>,

    /// Transmission label (e.g. "Manual")
    #[serde(default, deserialize_with = "lenient_label")]
    pub transmission: Option<String>,

    /// Age of the car in years (0-25)
    #[serde(default)]
    pub car_age: Option<InputValue>,
}

impl CarDetails {
    /// Create details from already-typed values
    pub fn new(
        present_price: f64,
        kms_driven: u32,
        owner: u8,
        fuel_type: &str,
        seller_type: &str,
        transmission: &str,
        car_age: u8,
    ) -> Self {
        Self {
            present_price: Some(present_price.into()),
            kms_driven: Some(f64::from(kms_driven).into()),
            owner: Some(f64::from(owner).into()),
            fuel_type: Some(fuel_type.to_string()),
            seller_type: Some(seller_type.to_string()),
            transmission: Some(transmission.to_string()),
            car_age: Some(f64::from(car_age).into()),
        }
    }
}
