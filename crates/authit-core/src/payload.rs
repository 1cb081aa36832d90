use serde_json::{Map, Value};

/// Top-level fields of a JSON object body. Missing, unparsable and non-object
/// bodies all yield an empty map.
pub fn object_fields(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

/// A field read as text. Numbers are kept in their JSON spelling so a phone
/// sent as `5550100` survives; any other type counts as absent.
pub fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A field read as a number. Numeric strings such as `"12"` are accepted.
pub fn number_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
