//! Core type definitions for fieldcast.
//!
//! This crate defines the two vocabularies the coercion layer translates
//! between:
//! - [`TypeDescriptor`]: the application's logical type of a field, written
//!   in a compact canonical form (`"string"`, `"number[]"`, `"boolean | null"`)
//! - [`ExternalKind`]: the storage kind the external record store reports
//!   for a field, independent of the application's notion of types
//!
//! Runtime values on both sides are plain `serde_json::Value`s.

mod descriptor;
mod kind;

pub use descriptor::{runtime_kind_of, BaseKind, Cardinality, TypeDescriptor};
pub use kind::ExternalKind;

/// Result type for descriptor operations.
pub type DescriptorResult<T> = std::result::Result<T, DescriptorError>;

/// Errors that can occur while parsing or transforming type descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// The string is not one of the canonical descriptor forms.
    #[error("malformed type descriptor: {0:?}")]
    Malformed(String),

    /// Singularization was requested on a descriptor without an array marker.
    #[error("not an array type: {0}")]
    NotAnArray(String),

    /// The string does not name any external storage kind.
    #[error("unknown external kind: {0:?}")]
    UnknownKind(String),
}
