//! Data values backing a templating pass.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::Result;

/// A value from the payload a document is resolved against.
///
/// `Absent` covers both an explicit JSON `null` and identifiers that resolve
/// to nothing in lenient mode.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<DataValue>),
    Map(HashMap<String, DataValue>),
}

impl DataValue {
    /// Parses a JSON document into a `DataValue`.
    pub fn from_json(json: &str) -> Result<DataValue> {
        let parsed: JsonValue = serde_json::from_str(json)?;
        Ok(parsed.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Absent => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
            DataValue::List(_) => "list",
            DataValue::Map(_) => "mapping",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DataValue::Absent)
    }

    /// Text form of a scalar. `None` for absent values and collections.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            DataValue::Bool(b) => Some(b.to_string()),
            DataValue::Int(i) => Some(i.to_string()),
            DataValue::Float(f) => Some(f.to_string()),
            DataValue::String(s) => Some(s.clone()),
            DataValue::Absent | DataValue::List(_) | DataValue::Map(_) => None,
        }
    }

    /// Text form of any value: scalars print directly, absent values print
    /// as the empty string and collections print as compact JSON.
    pub fn render_text(&self) -> String {
        match self {
            DataValue::Absent => String::new(),
            DataValue::List(_) | DataValue::Map(_) => self.to_json().to_string(),
            scalar => scalar.scalar_text().unwrap_or_default(),
        }
    }

    /// Converts back into a `serde_json::Value`.
    ///
    /// Floats that JSON cannot represent (NaN, infinities) become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            DataValue::Absent => JsonValue::Null,
            DataValue::Bool(b) => JsonValue::Bool(*b),
            DataValue::Int(i) => JsonValue::from(*i),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            DataValue::String(s) => JsonValue::String(s.clone()),
            DataValue::List(items) => {
                JsonValue::Array(items.iter().map(DataValue::to_json).collect())
            }
            DataValue::Map(fields) => {
                let mut map = serde_json::Map::new();
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl From<JsonValue> for DataValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => DataValue::Absent,
            JsonValue::Bool(b) => DataValue::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    DataValue::Float(f)
                } else {
                    DataValue::Absent
                }
            }
            JsonValue::String(s) => DataValue::String(s),
            JsonValue::Array(items) => {
                DataValue::List(items.into_iter().map(Into::into).collect())
            }
            JsonValue::Object(fields) => {
                DataValue::Map(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<Vec<DataValue>> for DataValue {
    fn from(value: Vec<DataValue>) -> Self {
        DataValue::List(value)
    }
}

impl From<HashMap<String, DataValue>> for DataValue {
    fn from(value: HashMap<String, DataValue>) -> Self {
        DataValue::Map(value)
    }
}

impl FromIterator<DataValue> for DataValue {
    fn from_iter<I: IntoIterator<Item = DataValue>>(iter: I) -> Self {
        DataValue::List(iter.into_iter().collect())
    }
}

impl FromIterator<(String, DataValue)> for DataValue {
    fn from_iter<I: IntoIterator<Item = (String, DataValue)>>(iter: I) -> Self {
        DataValue::Map(iter.into_iter().collect())
    }
}
