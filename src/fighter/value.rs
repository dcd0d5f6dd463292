use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

/// A typed field value coerced from CSV text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Coerces CSV text into the narrowest matching type.
///
/// Empty or missing text yields `None` so the caller can leave the field out
/// entirely. Otherwise the trimmed text is tried as an integer, then as a
/// finite float; anything else is kept verbatim as text. Integers too large
/// for `i64` therefore come back as floats. `inf` and `nan` stay text since
/// documents must remain JSON-compatible.
pub fn coerce(text: Option<&str>) -> Option<FieldValue> {
    let text = text.filter(|text| !text.is_empty())?;
    let trimmed = text.trim();

    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(FieldValue::Integer(integer));
    }

    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() => Some(FieldValue::Float(float)),
        _ => Some(FieldValue::Text(text.to_string())),
    }
}

impl FieldValue {
    /// Textual form used when the value becomes a document identifier or a
    /// lookup key. Whole floats keep their fractional digit (`42.0`).
    pub fn to_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(integer) => write!(f, "{integer}"),
            FieldValue::Float(float) if float.fract() == 0.0 && float.abs() < 1e16 => {
                write!(f, "{float:.1}")
            }
            FieldValue::Float(float) => write!(f, "{float}"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Integer(integer) => Value::Number(integer.into()),
            // coerce() only produces finite floats
            FieldValue::Float(float) => Number::from_f64(float)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(text) => Value::String(text),
        }
    }
}
