//! Records that filter expressions are evaluated against.
//!
//! A [`Record`] is a flat mapping from field name to a typed scalar [`Value`].
//! Records are usually built from JSON objects returned by the storage layer;
//! see [`Record::from_json`] and [`records_from_str`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while converting JSON into records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The input was valid JSON but not an array of records.
    #[error("expected a JSON array of records, found {found}")]
    NotAnArray {
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// An element of the input was not a JSON object.
    #[error("record at index {index} is not a JSON object (found {found})")]
    NotAnObject {
        /// Position of the offending element in the input array.
        index: usize,
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// The input was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A typed scalar stored in a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An explicit null (nullable column without a value).
    Null,
    /// A boolean flag such as `is_active`.
    Bool(bool),
    /// Any numeric column. Integers and decimals share one representation.
    Number(f64),
    /// Text, including plain `YYYY-MM-DD` dates.
    String(String),
    /// A point in time with its original UTC offset.
    Timestamp(DateTime<FixedOffset>),
}

impl Value {
    /// Returns the name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a scalar JSON value. Objects and arrays have no scalar form.
    fn from_json_scalar(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(b)),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
            serde_json::Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(ts) => Some(Value::Timestamp(ts)),
                Err(_) => Some(Value::String(s)),
            },
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value.fixed_offset())
    }
}

/// A single record: field name to scalar value.
///
/// Field order carries no meaning. Filtering never mutates a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object.
    ///
    /// Strings that parse as RFC 3339 become [`Value::Timestamp`]. Nested
    /// objects and arrays (e.g. a `location` or `weather` payload) are not
    /// filterable scalars and are left out.
    ///
    /// Returns `None` if `value` is not an object.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        let serde_json::Value::Object(map) = value else {
            return None;
        };

        let mut record = Record::new();
        for (name, raw) in map {
            match Value::from_json_scalar(raw) {
                Some(value) => {
                    record.fields.insert(name, value);
                }
                None => tracing::trace!(field = %name, "skipping non-scalar field"),
            }
        }
        Some(record)
    }

    /// Inserts or replaces a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Builder-style variant of [`Record::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Returns the value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns true if the record has the field (even if it is null).
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates over field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in sorted field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Converts a JSON array of objects into records, preserving order.
pub fn records_from_json(value: serde_json::Value) -> Result<Vec<Record>, RecordError> {
    let serde_json::Value::Array(items) = value else {
        return Err(RecordError::NotAnArray {
            found: json_type_name(&value),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let found = json_type_name(&item);
            Record::from_json(item).ok_or(RecordError::NotAnObject { index, found })
        })
        .collect()
}

/// Parses a JSON document containing an array of records.
pub fn records_from_str(input: &str) -> Result<Vec<Record>, RecordError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    records_from_json(value)
}
