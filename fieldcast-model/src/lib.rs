//! Table and record model for fieldcast.
//!
//! Defines the shapes the coercion layer reads and writes:
//! - [`TableSchema`]: a validated, immutable table declaration (logical field
//!   → type descriptor, plus optional external field-name mappings)
//! - [`TableDefinition`]: the serde-facing form a schema is declared in
//! - [`FieldSpec`] / [`FieldTarget`]: per-field name resolution, including
//!   spreading one logical array across several external fields
//! - [`LogicalRecord`], [`PartialRecord`], [`ExternalFieldSet`]: record shapes
//! - [`ExternalRecord`] / [`FieldKinds`]: the read contract expected from the
//!   store collaborator, with [`RawRecord`] and [`ExternalTable`] as the
//!   provided implementations
//!
//! Schemas are built once and shared; records live for a single call.

mod error;
mod external;
mod name_mapper;
mod record;
mod schema;

pub use error::{SchemaError, SchemaResult};
pub use external::{ExternalField, ExternalRecord, ExternalTable, FieldKinds, RawRecord};
pub use name_mapper::{DistributeError, FieldNameMapping, FieldSpec, FieldTarget};
pub use record::{ExternalFieldSet, LogicalRecord, PartialRecord};
pub use schema::{MappingDefinition, TableDefinition, TableSchema, RESERVED_ID_FIELD};
