//! Record access for the matcher
//!
//! A record is a JSON object. Segmented keys address nested fields: the
//! first segment selects a top-level field, remaining segments descend into
//! objects. A top-level field holding JSON encoded as a string (a string
//! whose shape looks like an object or array) is decoded once before
//! descending, so `payload:user:id` works whether `payload` arrived as an
//! object or as its serialized text.

use fql_core::Key;
use serde_json::Value as JsonValue;

/// A single record to match against.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    data: JsonValue,
}

impl Record {
    pub fn new(data: JsonValue) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &JsonValue {
        &self.data
    }

    /// Resolve a key to its value. `None` means the field, or some segment
    /// of the path to it, is absent.
    pub fn get_value(&self, key: &Key) -> Option<JsonValue> {
        let (first, rest) = key.segments().split_first()?;
        let value = self.data.get(first.as_str())?;

        if rest.is_empty() {
            return Some(value.clone());
        }

        let value = if is_probably_jsonstring(value) {
            match value.as_str() {
                Some(text) => serde_json::from_str(text).ok()?,
                None => return None,
            }
        } else if value.is_object() {
            value.clone()
        } else {
            return None;
        };

        extract_path(value, rest)
    }
}

fn extract_path(value: JsonValue, path: &[String]) -> Option<JsonValue> {
    let mut value = value;
    for segment in path {
        value = value.get(segment.as_str())?.clone();
    }
    Some(value)
}

fn is_probably_jsonstring(value: &JsonValue) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };
    (text.starts_with('{') && text.ends_with('}'))
        || (text.starts_with('[') && text.ends_with(']'))
}
