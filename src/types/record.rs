//! Raw and sanitized sales record types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single loosely typed cell as produced by a tabular parser
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Convert a JSON value into a cell. Nested arrays/objects are kept as
    /// their JSON text so they can never abort a batch.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map(CellValue::Float).unwrap_or_default(),
            },
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// Text form of the cell; `Null` becomes the empty string.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.is_finite() => f.to_string(),
            CellValue::Float(_) => String::new(),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Integer coercion, truncating fractional input.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => truncate(*f),
            CellValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
            CellValue::Null | CellValue::Bool(_) => None,
        }
    }

    /// Decimal coercion; non-finite values are rejected.
    pub fn to_decimal(&self) -> Option<f64> {
        let value = match self {
            CellValue::Int(i) => *i as f64,
            CellValue::Float(f) => *f,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Null | CellValue::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

/// One parsed row before sanitization, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: &str, value: impl Into<CellValue>) -> Self {
        self.insert(field, value.into());
        self
    }

    pub fn insert(&mut self, field: &str, value: CellValue) {
        self.cells.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.cells.get(field)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// A sanitized transaction line. Every field is always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SalesRecord {
    pub customer_id: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub product: String,
    pub quantity: i64,
    pub price: f64,
    /// Authoritative revenue for the line, even when it disagrees with
    /// `quantity * price`
    pub total_value: f64,
    pub date: String,
    pub year_month: String,
}

impl SalesRecord {
    /// True when city, state and zip are all non-empty
    pub fn has_full_location(&self) -> bool {
        !self.city.is_empty() && !self.state.is_empty() && !self.zip.is_empty()
    }
}
