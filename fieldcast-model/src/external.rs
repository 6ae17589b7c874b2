//! Read contract for the external store.
//!
//! The store collaborator describes a live table by reporting, for each
//! external field name, its current storage kind. Records expose their raw
//! values alongside that description.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use fieldcast_types::ExternalKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaResult;

/// Reports the storage kind of external fields, as the live store sees them.
pub trait FieldKinds {
    /// Returns `None` when the store has no such field.
    fn kind_of(&self, field: &str) -> Option<ExternalKind>;
}

/// A raw record fetched from the external store.
pub trait ExternalRecord: FieldKinds {
    fn id(&self) -> &str;

    /// Raw value of an external field. `None` when the store omitted it,
    /// which it does for empty cells.
    fn field(&self, name: &str) -> Option<&Value>;
}

/// One field of a live external table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExternalKind,
}

/// Description of a live external table.
///
/// ```json
/// { "name": "cohort", "fields": [ { "name": "Cohort sessions", "type": "multipleRecordLinks" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTable {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<ExternalField>,
}

impl ExternalTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, kind: ExternalKind) -> Self {
        self.fields.push(ExternalField {
            name: name.into(),
            kind,
        });
        self
    }

    /// Parses a JSON table description.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FieldKinds for ExternalTable {
    fn kind_of(&self, field: &str) -> Option<ExternalKind> {
        self.fields.iter().find(|f| f.name == field).map(|f| f.kind)
    }
}

impl<T: FieldKinds + ?Sized> FieldKinds for &T {
    fn kind_of(&self, field: &str) -> Option<ExternalKind> {
        (**self).kind_of(field)
    }
}

impl<T: FieldKinds + ?Sized> FieldKinds for Arc<T> {
    fn kind_of(&self, field: &str) -> Option<ExternalKind> {
        (**self).kind_of(field)
    }
}

impl FieldKinds for BTreeMap<String, ExternalKind> {
    fn kind_of(&self, field: &str) -> Option<ExternalKind> {
        self.get(field).copied()
    }
}

impl FieldKinds for HashMap<String, ExternalKind> {
    fn kind_of(&self, field: &str) -> Option<ExternalKind> {
        self.get(field).copied()
    }
}

/// A raw record backed by a shared live table description.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub fields: Map<String, Value>,
    pub table: Arc<ExternalTable>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, table: Arc<ExternalTable>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
            table,
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}

impl FieldKinds for RawRecord {
    fn kind_of(&self, field: &str) -> Option<ExternalKind> {
        self.table.kind_of(field)
    }
}

impl ExternalRecord for RawRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
