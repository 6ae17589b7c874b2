//! Type coercion between external store records and logical records.
//!
//! The external store types each field with a storage kind that is unrelated
//! to the application's logical types. This crate bridges the two:
//! - [`LogicalFamily`]: the logical types the registry knows how to convert
//! - [`Conversion`] / [`ConversionRegistry`]: the exhaustive
//!   (family × external kind) conversion table, built once and shared
//! - [`Converter`]: one registered pair's read and write directions
//! - [`RecordCoercer`]: whole-record conversion in both directions, driven by
//!   a [`fieldcast_model::TableSchema`]
//!
//! Every operation is synchronous and pure. Any failure aborts the whole
//! record; no partial record is ever returned.

mod coercer;
mod conversion;
mod datetime;
mod error;
mod family;
mod registry;

pub use coercer::RecordCoercer;
pub use conversion::{conversion_for, Conversion, Converter};
pub use error::{CoerceError, CoerceResult, ConvertError, ErrorKind};
pub use family::LogicalFamily;
pub use registry::ConversionRegistry;
