//! Dirty tracking helpers.
//!
//! A resource keeps a JSON snapshot of its fields as last seen on the server.
//! On save, the current fields are serialized and compared to that snapshot
//! key by key, and only changed keys are sent in the PATCH body.
//!
//! Comparison is per top-level field. A changed nested object (a descriptor,
//! for instance) is sent whole, since the server replaces JSON fields rather
//! than merging them.
//!
//! # Example
//!
//! ```rust
//! use resolwe_sdk::rest::tracking::changed_fields;
//! use serde_json::json;
//!
//! let original = json!({"name": "A", "slug": "s", "id": 1});
//! let current = json!({"name": "B", "slug": "s", "id": 1});
//!
//! let changes = changed_fields(&original, &current, &["name", "slug"]);
//! assert_eq!(serde_json::Value::Object(changes), json!({"name": "B"}));
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

/// Serializes fields into the JSON object used for tracking.
///
/// # Errors
///
/// Returns the serialization error if `fields` cannot be represented as JSON.
pub fn snapshot<T: Serialize>(fields: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(fields)
}

/// Returns the listed fields whose values differ between `original` and `current`.
///
/// A field absent from `original` counts as changed when present in `current`.
#[must_use]
pub fn changed_fields(original: &Value, current: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|field| {
            let value = current.get(*field)?;
            (original.get(*field) != Some(value)).then(|| ((*field).to_string(), value.clone()))
        })
        .collect()
}

/// Returns the listed fields of `current` that hold a non-empty value.
///
/// Used to build creation payloads so that server-side defaults apply to
/// everything the caller did not set.
#[must_use]
pub fn non_empty_fields<'a>(
    current: &Value,
    fields: impl IntoIterator<Item = &'a str>,
) -> Map<String, Value> {
    fields
        .into_iter()
        .filter_map(|field| {
            let value = current.get(field)?;
            (!is_empty_value(value)).then(|| (field.to_string(), value.clone()))
        })
        .collect()
}

/// `null`, `""`, `[]` and `{}` are empty. Numbers and booleans never are.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Drops top-level `null` entries so the field falls back to its default.
#[must_use]
pub fn strip_nulls(payload: Value) -> Value {
    match payload {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => other,
    }
}
