//! Opaque result rows
//!
//! Row shape is owned by the view definitions, so a row is just a JSON
//! object. Accessors coerce leniently: a missing, null or non-numeric field
//! reads as `0` for numeric purposes instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row returned by a view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Build from a JSON value; anything but an object yields an empty row
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Raw value of a column, `Null` when absent
    pub fn get(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&Value::Null)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Numeric value of a column, 0 when missing or not a number
    pub fn number(&self, key: &str) -> f64 {
        to_number(self.get(key)).unwrap_or(0.0)
    }

    /// Text of a column (numbers and booleans are rendered), `None` when null
    pub fn text(&self, key: &str) -> Option<String> {
        display_value(self.get(key))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Value> for Row {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Coerce a JSON value to a finite number
///
/// Numeric strings (as PostgreSQL `numeric` may arrive) are parsed.
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Plain display form of a scalar value, `None` for null
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
