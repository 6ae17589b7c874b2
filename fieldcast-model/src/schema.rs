//! Table schema declarations.
//!
//! A table is declared as a [`TableDefinition`] (usually JSON) and validated
//! once into an immutable [`TableSchema`]:
//!
//! ```json
//! {
//!   "name": "cohort class",
//!   "schema": { "Facilitator": "string", "Start date/time": "number | null" },
//!   "mappings": { "Facilitator": "[>] Facilitator" }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use fieldcast_types::TypeDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::name_mapper::{FieldNameMapping, FieldSpec};

/// Field name reserved for the record id, which is never coerced.
pub const RESERVED_ID_FIELD: &str = "id";

/// Declared mapping of one logical field to external field name(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingDefinition {
    /// `"External name"`
    Single(String),
    /// `["Field 1", "Field 2"]`, one element per field.
    Spread(Vec<String>),
}

impl From<MappingDefinition> for FieldNameMapping {
    fn from(def: MappingDefinition) -> Self {
        match def {
            MappingDefinition::Single(name) => FieldNameMapping::Single(name),
            MappingDefinition::Spread(names) => FieldNameMapping::Spread(names),
        }
    }
}

/// Unvalidated table declaration, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name, used in error messages.
    pub name: String,
    /// Logical field name → descriptor string.
    pub schema: BTreeMap<String, String>,
    /// Logical field name → external name(s). Unlisted fields keep their name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, MappingDefinition>,
}

impl TableDefinition {
    /// Starts an empty declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declares a logical field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.schema.insert(name.into(), descriptor.into());
        self
    }

    /// Stores a logical field under a different external name.
    #[must_use]
    pub fn map_to(mut self, field: impl Into<String>, external: impl Into<String>) -> Self {
        self.mappings
            .insert(field.into(), MappingDefinition::Single(external.into()));
        self
    }

    /// Spreads a logical array field across several external fields.
    #[must_use]
    pub fn spread<I, S>(mut self, field: impl Into<String>, externals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = externals.into_iter().map(Into::into).collect();
        self.mappings
            .insert(field.into(), MappingDefinition::Spread(names));
        self
    }
}

/// Validated, immutable table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl TableSchema {
    /// Parses and validates a JSON table declaration.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let def: TableDefinition = serde_json::from_str(json)?;
        Self::try_from(def)
    }

    /// Validates an already-parsed JSON table declaration.
    pub fn from_value(value: serde_json::Value) -> SchemaResult<Self> {
        let def: TableDefinition = serde_json::from_value(value)?;
        Self::try_from(def)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, ordered by logical name.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a declared field by logical name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Declared type of a logical field.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<TypeDescriptor> {
        self.field(name).map(FieldSpec::descriptor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every external field this table reads, in field then mapping order.
    ///
    /// Callers use this to request only the fields they need from the store.
    #[must_use]
    pub fn external_field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .flat_map(|f| f.targets().iter().map(|t| t.external()))
            .collect()
    }

    /// External field name → type its value coerces to. Spread fields
    /// contribute their element type once per external field.
    #[must_use]
    pub fn external_types(&self) -> BTreeMap<&str, TypeDescriptor> {
        self.fields
            .iter()
            .flat_map(|f| f.targets().iter().map(|t| (t.external(), t.expected())))
            .collect()
    }
}

impl TryFrom<TableDefinition> for TableSchema {
    type Error = SchemaError;

    fn try_from(def: TableDefinition) -> SchemaResult<Self> {
        let TableDefinition {
            name: table,
            schema,
            mut mappings,
        } = def;

        if schema.contains_key(RESERVED_ID_FIELD) {
            return Err(SchemaError::ReservedField { table });
        }
        if let Some(field) = mappings.keys().find(|k| !schema.contains_key(*k)) {
            return Err(SchemaError::UnknownMappedField {
                field: field.clone(),
                table,
            });
        }

        let mut fields = Vec::with_capacity(schema.len());
        let mut seen = BTreeSet::new();

        for (field, raw) in schema {
            let descriptor =
                TypeDescriptor::parse(&raw).map_err(|source| SchemaError::Descriptor {
                    table: table.clone(),
                    field: field.clone(),
                    source,
                })?;

            let mapping = mappings
                .remove(&field)
                .map(FieldNameMapping::from)
                .unwrap_or_default();
            if matches!(&mapping, FieldNameMapping::Spread(names) if names.is_empty()) {
                return Err(SchemaError::EmptySpread { table, field });
            }

            let spec = FieldSpec::resolve(field.clone(), descriptor, mapping).map_err(|source| {
                SchemaError::Descriptor {
                    table: table.clone(),
                    field,
                    source,
                }
            })?;

            for target in spec.targets() {
                if !seen.insert(target.external().to_string()) {
                    return Err(SchemaError::DuplicateExternalName {
                        name: target.external().to_string(),
                        table,
                    });
                }
            }
            fields.push(spec);
        }

        Ok(Self {
            name: table,
            fields,
        })
    }
}
