//! Logical type families known to the conversion registry.

use std::fmt;

use fieldcast_types::{BaseKind, Cardinality, TypeDescriptor};

/// A logical type the registry has conversions for.
///
/// Arrays of numbers or booleans have no family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalFamily {
    String,
    NullableString,
    Number,
    NullableNumber,
    Boolean,
    NullableBoolean,
    StringArray,
    NullableStringArray,
}

impl LogicalFamily {
    pub const COUNT: usize = 8;

    pub const ALL: [LogicalFamily; Self::COUNT] = [
        Self::String,
        Self::NullableString,
        Self::Number,
        Self::NullableNumber,
        Self::Boolean,
        Self::NullableBoolean,
        Self::StringArray,
        Self::NullableStringArray,
    ];

    /// Family of a descriptor, if the registry covers it.
    #[must_use]
    pub const fn of(descriptor: &TypeDescriptor) -> Option<Self> {
        let nullable = descriptor.is_nullable();
        match (descriptor.base(), descriptor.cardinality()) {
            (BaseKind::String, Cardinality::Scalar) if nullable => Some(Self::NullableString),
            (BaseKind::String, Cardinality::Scalar) => Some(Self::String),
            (BaseKind::Number, Cardinality::Scalar) if nullable => Some(Self::NullableNumber),
            (BaseKind::Number, Cardinality::Scalar) => Some(Self::Number),
            (BaseKind::Boolean, Cardinality::Scalar) if nullable => Some(Self::NullableBoolean),
            (BaseKind::Boolean, Cardinality::Scalar) => Some(Self::Boolean),
            (BaseKind::String, Cardinality::Array) if nullable => Some(Self::NullableStringArray),
            (BaseKind::String, Cardinality::Array) => Some(Self::StringArray),
            (BaseKind::Number | BaseKind::Boolean, Cardinality::Array) => None,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_nullable(self) -> bool {
        matches!(
            self,
            Self::NullableString
                | Self::NullableNumber
                | Self::NullableBoolean
                | Self::NullableStringArray
        )
    }

    /// Element kind of the family.
    #[must_use]
    pub const fn base(self) -> BaseKind {
        match self {
            Self::String | Self::NullableString | Self::StringArray | Self::NullableStringArray => {
                BaseKind::String
            }
            Self::Number | Self::NullableNumber => BaseKind::Number,
            Self::Boolean | Self::NullableBoolean => BaseKind::Boolean,
        }
    }

    /// Canonical descriptor of the family.
    #[must_use]
    pub const fn descriptor(self) -> TypeDescriptor {
        let cardinality = match self {
            Self::StringArray | Self::NullableStringArray => Cardinality::Array,
            _ => Cardinality::Scalar,
        };
        TypeDescriptor::new(self.base(), cardinality, self.is_nullable())
    }
}

impl fmt::Display for LogicalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}
