use crate::value::Value;
use serde_json::Value as JsonValue;

// Rows fetched as JSON documents convert losslessly except for
// numbers outside the i64 range, which fall back to floats.
impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => n
                .as_i64()
                .map_or_else(|| n.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            JsonValue::String(s) => Self::Text(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl Value {
    /// Split a JSON object into `(field, value)` pairs suitable as model input.
    /// Non-object documents yield no pairs.
    #[must_use]
    pub fn json_row(doc: JsonValue) -> Vec<(String, Self)> {
        match doc {
            JsonValue::Object(map) => map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            _ => Vec::new(),
        }
    }
}
