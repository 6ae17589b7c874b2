//! Error types for record coercion.

use std::fmt;

use fieldcast_model::{DistributeError, SchemaError};
use fieldcast_types::{DescriptorError, ExternalKind, TypeDescriptor};
use serde_json::Value;
use thiserror::Error;

/// Result type for coercion operations.
pub type CoerceResult<T> = Result<T, CoerceError>;

/// Flat classification of every coercion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedTypeDescriptor,
    NotAnArrayType,
    UnknownExternalType,
    IncompatibleKind,
    ReadOnlyField,
    ArityMismatch,
    RequiredValueMissing,
    TypeMismatchOnRead,
    TypeMismatchOnWrite,
    InvalidDateTime,
    /// The table declaration itself is inconsistent.
    InvalidSchema,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedTypeDescriptor => "malformed_type_descriptor",
            Self::NotAnArrayType => "not_an_array_type",
            Self::UnknownExternalType => "unknown_external_type",
            Self::IncompatibleKind => "incompatible_kind",
            Self::ReadOnlyField => "read_only_field",
            Self::ArityMismatch => "arity_mismatch",
            Self::RequiredValueMissing => "required_value_missing",
            Self::TypeMismatchOnRead => "type_mismatch_on_read",
            Self::TypeMismatchOnWrite => "type_mismatch_on_write",
            Self::InvalidDateTime => "invalid_date_time",
            Self::InvalidSchema => "invalid_schema",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DescriptorError> for ErrorKind {
    fn from(err: &DescriptorError) -> Self {
        match err {
            DescriptorError::Malformed(_) => Self::MalformedTypeDescriptor,
            DescriptorError::NotAnArray(_) => Self::NotAnArrayType,
            DescriptorError::UnknownKind(_) => Self::UnknownExternalType,
        }
    }
}

/// Failure of a single converter on a single value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The store computes this kind; it cannot be written.
    #[error("{kind} fields are read-only")]
    ReadOnly { kind: ExternalKind },

    /// A scalar was unwrapped from an array without exactly one entry.
    #[error("expected exactly one {kind} entry, found {found}")]
    Arity { kind: ExternalKind, found: usize },

    /// A non-nullable numeric value was absent or null.
    #[error("missing required {kind} value")]
    RequiredMissing { kind: ExternalKind },

    /// A raw value read from the store has the wrong runtime kind.
    #[error("expected {expected} in {kind} field, found {found}")]
    UnexpectedValue {
        kind: ExternalKind,
        expected: String,
        found: &'static str,
    },

    /// A date-time could not be parsed or represented.
    #[error("invalid date-time: {0}")]
    InvalidDateTime(String),

    /// The pair has no registered conversion.
    #[error("no conversion for {kind} fields")]
    Unsupported { kind: ExternalKind },
}

impl ConvertError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ReadOnly { .. } => ErrorKind::ReadOnlyField,
            Self::Arity { .. } => ErrorKind::ArityMismatch,
            Self::RequiredMissing { .. } => ErrorKind::RequiredValueMissing,
            Self::UnexpectedValue { .. } => ErrorKind::TypeMismatchOnRead,
            Self::InvalidDateTime(_) => ErrorKind::InvalidDateTime,
            Self::Unsupported { .. } => ErrorKind::IncompatibleKind,
        }
    }
}

/// Failure of a whole-record coercion. Always names the table and the
/// logical field involved.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// The store reports no kind for an external field the schema references.
    #[error("{table}.{field}: the store reports no field named {external:?}")]
    UnknownExternalType {
        table: String,
        field: String,
        external: String,
    },

    /// The reported kind has no conversion for the declared type.
    #[error(
        "{table}.{field}: expected `{expected}` but external field {external:?} is {found}, which cannot hold it"
    )]
    IncompatibleKind {
        table: String,
        field: String,
        external: String,
        expected: TypeDescriptor,
        found: ExternalKind,
    },

    /// A value to be written does not match the field's declared type.
    #[error("{table}.{field}: value {value} does not match `{expected}`")]
    TypeMismatchOnWrite {
        table: String,
        field: String,
        expected: TypeDescriptor,
        value: Value,
    },

    /// A logical array could not be spread across its external fields.
    #[error("{table}.{field}: {source}")]
    Spread {
        table: String,
        field: String,
        #[source]
        source: DistributeError,
    },

    /// A converter rejected a value.
    #[error("{table}.{field} ({external:?}): {source}")]
    Convert {
        table: String,
        field: String,
        external: String,
        #[source]
        source: ConvertError,
    },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CoerceError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownExternalType { .. } => ErrorKind::UnknownExternalType,
            Self::IncompatibleKind { .. } => ErrorKind::IncompatibleKind,
            Self::TypeMismatchOnWrite { .. } => ErrorKind::TypeMismatchOnWrite,
            Self::Spread { source, .. } => match source {
                DistributeError::LengthMismatch { .. } => ErrorKind::ArityMismatch,
                DistributeError::NotAnArray { .. } => ErrorKind::TypeMismatchOnWrite,
            },
            Self::Convert { source, .. } => source.kind(),
            Self::Descriptor(err) => ErrorKind::from(err),
            Self::Schema(SchemaError::Descriptor { source, .. }) => ErrorKind::from(source),
            Self::Schema(_) => ErrorKind::InvalidSchema,
        }
    }

    /// Logical field the error concerns, when there is one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownExternalType { field, .. }
            | Self::IncompatibleKind { field, .. }
            | Self::TypeMismatchOnWrite { field, .. }
            | Self::Spread { field, .. }
            | Self::Convert { field, .. } => Some(field),
            Self::Descriptor(_) | Self::Schema(_) => None,
        }
    }
}
