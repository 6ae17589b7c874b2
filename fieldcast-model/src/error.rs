//! Error types for schema construction.

use fieldcast_types::DescriptorError;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while validating a table declaration.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field's descriptor is malformed, or a spread mapping targets a
    /// non-array field.
    #[error("table {table:?}, field {field:?}: {source}")]
    Descriptor {
        table: String,
        field: String,
        #[source]
        source: DescriptorError,
    },

    /// The record id is carried separately and cannot be declared as a field.
    #[error("table {table:?} declares the reserved field \"id\"")]
    ReservedField { table: String },

    /// A mapping names a field the schema does not declare.
    #[error("table {table:?} maps undeclared field {field:?}")]
    UnknownMappedField { table: String, field: String },

    /// A spread mapping lists no external fields.
    #[error("table {table:?}, field {field:?}: spread mapping has no external fields")]
    EmptySpread { table: String, field: String },

    /// Two logical fields resolve to the same external field.
    #[error("table {table:?}: external field {name:?} is mapped more than once")]
    DuplicateExternalName { table: String, name: String },

    /// The declaration is not valid JSON for its shape.
    #[error("invalid table declaration: {0}")]
    Json(#[from] serde_json::Error),
}
