use serde_json::{Map, Value};

/// Keys a payload must carry before it is persisted. Presence is the whole
/// check; values are never typed or range-checked.
pub const REQUIRED_KEYS: [&str; 5] = [
    "distance",
    "buttonZeroState",
    "buttonOneState",
    "buttonTwoState",
    "buttonThreeState",
];

pub const TIMESTAMP_KEY: &str = "timestamp";

/// A sensor-pad reading accepted for insertion.
///
/// Wraps the payload object as parsed, so the persisted column order is the
/// order the client supplied the keys, with `timestamp` appended last.
#[derive(Debug, Clone)]
pub struct Reading {
    fields: Map<String, Value>,
}

impl Reading {
    /// Accepts the parsed payload only if it is an object carrying all
    /// required keys. An explicit `null` counts as present.
    pub fn from_payload(payload: Value) -> Option<Reading> {
        let fields = match payload {
            Value::Object(fields) => fields,
            _ => return None,
        };

        if REQUIRED_KEYS.iter().all(|key| fields.contains_key(*key)) {
            Some(Reading { fields })
        } else {
            None
        }
    }

    /// Records the server-side receipt time as the final column.
    pub fn stamp(&mut self, timestamp: String) {
        self.fields
            .insert(TIMESTAMP_KEY.to_string(), Value::String(timestamp));
    }

    /// Renders the reading as one row of field text, in key order.
    pub fn row(&self) -> Vec<String> {
        self.fields.values().map(field_text).collect()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// String values are written raw, `null` as an empty field, and anything
/// else in its compact JSON form.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
