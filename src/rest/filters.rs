//! Query filter composition.
//!
//! [`Filters`] accumulates `key -> value` criteria for a list endpoint and
//! renders them either as URL query parameters (GET endpoints) or as a JSON
//! body (POST search endpoints).
//!
//! - GET endpoints: setting a key again replaces its value.
//! - POST endpoints: setting a key again appends, and repeated keys are
//!   rendered as a JSON array.
//!
//! Keys use the server's `__` lookup syntax (`created__gt`, `name__icontains`).
//! A `sample` segment is rewritten to `entity`, which is what the server calls
//! samples.
//!
//! # Example
//!
//! ```rust
//! use resolwe_sdk::rest::{FilterValue, Filters};
//!
//! let mut filters = Filters::new();
//! filters.insert("sample__name", "liver", false);
//! filters.insert("tags", vec!["rna", "human"], false);
//!
//! assert_eq!(
//!     filters.to_query_params(),
//!     vec![
//!         ("entity__name".to_string(), "liver".to_string()),
//!         ("tags".to_string(), "rna,human".to_string()),
//!     ]
//! );
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::rest::resource::{Resource, ResourceKind};

/// A single filter value.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    /// No value. Renders as an empty string or JSON `null`.
    Null,
    /// A string.
    Text(String),
    /// An integer.
    Integer(i64),
    /// A boolean, rendered `true`/`false`.
    Bool(bool),
    /// A timestamp, rendered as RFC 3339.
    Timestamp(DateTime<Utc>),
    /// Several values, rendered comma-separated or as a JSON array.
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Renders the value for a URL query string.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(text) => text.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Self::List(items) => items
                .iter()
                .map(Self::to_query_value)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Renders the value as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
            Self::Integer(n) => Value::from(*n),
            Self::Bool(b) => Value::Bool(*b),
            Self::Timestamp(_) => Value::String(self.to_query_value()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A resource used as a filter value stands for its id.
impl<T: ResourceKind> From<&Resource<T>> for FilterValue {
    fn from(resource: &Resource<T>) -> Self {
        resource.id().into()
    }
}

/// Rewrites `sample` key segments to `entity`.
///
/// ```rust
/// use resolwe_sdk::rest::filters::normalize_key;
///
/// assert_eq!(normalize_key("sample"), "entity");
/// assert_eq!(normalize_key("sample__name__icontains"), "entity__name__icontains");
/// assert_eq!(normalize_key("samples"), "samples");
/// ```
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.split("__")
        .map(|segment| if segment == "sample" { "entity" } else { segment })
        .collect::<Vec<_>>()
        .join("__")
}

/// Accumulated filter criteria of a query.
///
/// Keys are kept sorted so rendered URLs are reproducible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filters {
    entries: BTreeMap<String, Vec<FilterValue>>,
}

impl Filters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion.
    ///
    /// With `repeat` the value is appended to any existing values of the key;
    /// otherwise it replaces them.
    pub fn insert(&mut self, key: &str, value: impl Into<FilterValue>, repeat: bool) {
        let values = self.entries.entry(normalize_key(key)).or_default();
        if !repeat {
            values.clear();
        }
        values.push(value.into());
    }

    /// Returns the values of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[FilterValue]> {
        self.entries.get(&normalize_key(key)).map(Vec::as_slice)
    }

    /// Returns `true` if a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no criteria are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FilterValue])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Renders the criteria as URL query parameters.
    ///
    /// A key holding several values yields one parameter per value.
    #[must_use]
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        self.iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| (key.to_string(), value.to_query_value()))
            })
            .collect()
    }

    /// Renders the criteria as a JSON object for search endpoints.
    ///
    /// A key holding several values becomes an array.
    #[must_use]
    pub fn to_json_body(&self) -> Map<String, Value> {
        self.iter()
            .map(|(key, values)| {
                let value = match values {
                    [single] => single.to_json(),
                    many => Value::Array(many.iter().map(FilterValue::to_json).collect()),
                };
                (key.to_string(), value)
            })
            .collect()
    }
}
