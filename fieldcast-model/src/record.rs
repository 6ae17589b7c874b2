//! Record shapes on either side of the coercion layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fully coerced application record.
///
/// Serializes flat: `{"id": "rec1", "Name": "Ada", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LogicalRecord {
    /// Creates a record with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Returns the value of a logical field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Extract a string value.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Extract a numeric value.
    pub fn get_number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Extract a boolean value.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Extract a string array, skipping non-string elements.
    pub fn get_str_array(&self, field: &str) -> Option<Vec<&str>> {
        self.get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }

    /// Converts into an update carrying every field and the id.
    pub fn into_partial(self) -> PartialRecord {
        PartialRecord {
            id: Some(self.id),
            fields: self.fields,
        }
    }
}

/// A logical record where absent keys mean "leave this field alone".
///
/// An explicit `null` is an update to null, not an absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PartialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Requests an update of one field.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Whether an update was requested for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// External field values ready to be sent to the store as an update payload.
///
/// Holds only the fields the update touched. The id identifies the record
/// and is never coerced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalFieldSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ExternalFieldSet {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
