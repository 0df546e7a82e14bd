// src/extract/fields.rs

//! Field extractors: each takes a raw value of unknown shape and returns a
//! typed value, or `None` when nothing usable is in there.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::FieldValue;
use crate::scraper::models::AttributeValue;

// ASCII digits only; `\d` would also match digits from other scripts.
lazy_static! {
    // "2+kk", "3 + 1", "1+ kk"
    static ref DISPOSITION_REGEX: Regex = Regex::new(r"[0-9]\s?\+\s?(?:kk|[0-9])").unwrap();
    static ref DIGITS_REGEX: Regex = Regex::new(r"[0-9]+").unwrap();
    // Decimal comma or dot: "65,5", "70", "4.2"
    static ref AREA_REGEX: Regex = Regex::new(r"[0-9]+(?:[,.][0-9]+)?").unwrap();
    static ref ENERGY_CLASS_REGEX: Regex = Regex::new(r"Třída ([A-G])").unwrap();
}

/// First disposition code in a display name, with whitespace removed.
pub fn disposition(display_name: &str) -> Option<String> {
    DISPOSITION_REGEX
        .find(display_name)
        .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
}

/// First run of digits, e.g. `"3. podlaží z 8"` gives `3`.
pub fn floor(raw: &str) -> Option<i64> {
    DIGITS_REGEX
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
}

/// First numeric token with the decimal comma normalized, e.g. `"65,5 m²"` gives `65.5`.
pub fn area(raw: &str) -> Option<f64> {
    AREA_REGEX
        .find(raw)
        .and_then(|m| m.as_str().replace(',', ".").parse().ok())
}

/// Balcony/loggia/terrace values come as a flag, a number, or a measured string.
pub fn amenity(raw: &AttributeValue) -> Option<FieldValue> {
    match raw {
        AttributeValue::Boolean(b) => Some(FieldValue::Bool(*b)),
        AttributeValue::Text(s) => area(s).map(FieldValue::Float),
        AttributeValue::Number(n) => n.as_f64().map(FieldValue::Float),
        AttributeValue::Other(_) => None,
    }
}

/// Energy class letter A-G following "Třída".
pub fn energy_class(raw: &str) -> Option<String> {
    ENERGY_CLASS_REGEX
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Copies a value through unchanged, keeping its representation.
pub fn pass_through(raw: &AttributeValue) -> Option<FieldValue> {
    match raw {
        AttributeValue::Boolean(b) => Some(FieldValue::Bool(*b)),
        AttributeValue::Text(s) => Some(FieldValue::Text(s.clone())),
        AttributeValue::Number(n) => match n.as_i64() {
            Some(i) => Some(FieldValue::Integer(i)),
            None => n.as_f64().map(FieldValue::Float),
        },
        AttributeValue::Other(serde_json::Value::Null) => None,
        AttributeValue::Other(v) => Some(FieldValue::Json(v.clone())),
    }
}
