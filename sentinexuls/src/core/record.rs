//! Open record type passed between stages.

use serde_json::Value;

/// An ordered, string-keyed mapping of JSON values.
///
/// Every stage input and output is a `Record`. There is no schema between
/// stages, so readers go through [`RecordExt`] and always supply a default.
pub type Record = serde_json::Map<String, Value>;

/// Default-providing accessors for [`Record`].
///
/// A key that is missing, or present with the wrong JSON type, yields the
/// default.
pub trait RecordExt {
    /// Returns the string at `key`, or `default`.
    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str;

    /// Returns the number at `key`, or `default`.
    fn f64_or(&self, key: &str, default: f64) -> f64;

    /// Returns the boolean at `key`, or `default`.
    fn bool_or(&self, key: &str, default: bool) -> bool;

    /// Returns a clone of the array at `key`, or `default`.
    fn array_or(&self, key: &str, default: Vec<Value>) -> Vec<Value>;

    /// Returns the string elements of the array at `key`, or `default`.
    ///
    /// Non-string elements are dropped.
    fn strings_or(&self, key: &str, default: &[&str]) -> Vec<String>;

    /// Returns a clone of the object at `key`, or an empty record.
    fn object_or_empty(&self, key: &str) -> Record;
}

impl RecordExt for Record {
    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn array_or(&self, key: &str, default: Vec<Value>) -> Vec<Value> {
        self.get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or(default)
    }

    fn strings_or(&self, key: &str, default: &[&str]) -> Vec<String> {
        match self.get(key).and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => default.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn object_or_empty(&self, key: &str) -> Record {
        self.get(key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

/// Builds a [`Record`] from a `serde_json::json!` object literal.
///
/// Non-object values produce an empty record.
#[must_use]
pub fn record_from(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}
