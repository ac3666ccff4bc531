//! HTML rendering of the prediction form

use crate::models::encoder::CategoricalFeature;
use crate::models::inference::PricePredictor;
use crate::presenter::Notice;
use crate::types::car::{CarDetails, InputValue};
use std::fmt::Write;

/// Highest owner count offered
pub const MAX_OWNERS: u8 = 3;

/// Slider bounds for the car age in years
pub const CAR_AGE_RANGE: (u8, u8) = (0, 25);

const DEFAULT_CAR_AGE: u8 = 5;

const STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:1rem;font-weight:600}\
input,select{width:100%;padding:.4rem;margin-top:.3rem}\
button{margin-top:1.5rem;padding:.6rem 1.2rem}\
.notice{margin-top:1.5rem;padding:.8rem;border-radius:6px}\
.success{background:#e6f4ea;color:#137333}\
.error{background:#fce8e6;color:#a50e0e}";

/// Values currently shown in the widgets
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub present_price: String,
    pub kms_driven: String,
    pub owner: String,
    pub fuel_type: String,
    pub seller_type: String,
    pub transmission: String,
    pub car_age: String,
}

impl FormState {
    /// Initial widget values: zeros, first vocabulary entries, age 5
    pub fn initial(predictor: &PricePredictor) -> Self {
        let first = |feature| {
            predictor
                .vocabulary(feature)
                .first()
                .cloned()
                .unwrap_or_default()
        };

        Self {
            present_price: "0.0".to_string(),
            kms_driven: "0".to_string(),
            owner: "0".to_string(),
            fuel_type: first(CategoricalFeature::FuelType),
            seller_type: first(CategoricalFeature::SellerType),
            transmission: first(CategoricalFeature::Transmission),
            car_age: DEFAULT_CAR_AGE.to_string(),
        }
    }

    /// Widget values after a submission
    pub fn from_details(details: &CarDetails) -> Self {
        let text = |value: &Option<InputValue>| value.as_ref().map(InputValue::display).unwrap_or_default();

        Self {
            present_price: text(&details.present_price),
            kms_driven: text(&details.kms_driven),
            owner: text(&details.owner),
            fuel_type: details.fuel_type.clone().unwrap_or_default(),
            seller_type: details.seller_type.clone().unwrap_or_default(),
            transmission: details.transmission.clone().unwrap_or_default(),
            car_age: text(&details.car_age),
        }
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn select<S: AsRef<str>>(name: &str, label: &str, options: &[S], selected: &str) -> String {
    let mut html = format!("<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n");
    for option in options {
        let option = escape_html(option.as_ref());
        let marker = if option == escape_html(selected) { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{option}\"{marker}>{option}</option>");
    }
    html.push_str("</select>\n");
    html
}

/// Render the full page
pub fn render_page(predictor: &PricePredictor, state: &FormState, notice: Option<&Notice>) -> String {
    let owners: Vec<String> = (0..=MAX_OWNERS).map(|n| n.to_string()).collect();
    let (age_min, age_max) = CAR_AGE_RANGE;

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Car Price Predictor</title>\n");
    let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>");
    html.push_str("<h1>🚗 Car Selling Price Predictor</h1>\n");
    html.push_str("<p>Enter the car details below to predict its selling price (in lakhs).</p>\n");
    html.push_str("<form method=\"post\" action=\"/predict\">\n");

    let _ = writeln!(
        html,
        "<label for=\"present_price\">💰 Present Price (in lakhs)</label>\n\
         <input type=\"number\" id=\"present_price\" name=\"present_price\" min=\"0\" step=\"0.1\" value=\"{}\">",
        escape_html(&state.present_price)
    );
    let _ = writeln!(
        html,
        "<label for=\"kms_driven\">🛣️ Kilometers Driven</label>\n\
         <input type=\"number\" id=\"kms_driven\" name=\"kms_driven\" min=\"0\" step=\"1\" value=\"{}\">",
        escape_html(&state.kms_driven)
    );
    html.push_str(&select("owner", "👤 Number of Previous Owners", &owners, &state.owner));
    html.push_str(&select(
        "fuel_type",
        "⛽ Fuel Type",
        predictor.vocabulary(CategoricalFeature::FuelType),
        &state.fuel_type,
    ));
    html.push_str(&select(
        "seller_type",
        "🏢 Seller Type",
        predictor.vocabulary(CategoricalFeature::SellerType),
        &state.seller_type,
    ));
    html.push_str(&select(
        "transmission",
        "⚙️ Transmission",
        predictor.vocabulary(CategoricalFeature::Transmission),
        &state.transmission,
    ));
    let _ = writeln!(
        html,
        "<label for=\"car_age\">📅 Car Age (Years): <output id=\"car_age_value\">{value}</output></label>\n\
         <input type=\"range\" id=\"car_age\" name=\"car_age\" min=\"{age_min}\" max=\"{age_max}\" step=\"1\" value=\"{value}\" \
         oninput=\"car_age_value.value = this.value\">",
        value = escape_html(&state.car_age)
    );

    html.push_str("<button type=\"submit\">🔍 Predict Selling Price</button>\n</form>\n");

    if let Some(notice) = notice {
        let _ = writeln!(
            html,
            "<div class=\"{}\" role=\"status\">{}</div>",
            notice.css_class(),
            escape_html(notice.message())
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}
