//! Logical type descriptors.
//!
//! A descriptor names a base kind, an optional array marker and an optional
//! null union, always in that order. The four canonical forms over a base
//! kind `b` are `b`, `b[]`, `b | null` and `b[] | null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::{DescriptorError, DescriptorResult};

const ARRAY_MARKER: &str = "[]";
const NULL_UNION: &str = " | null";

/// Scalar kind underlying a logical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseKind {
    String,
    Number,
    Boolean,
}

impl BaseKind {
    /// Returns the keyword used for this kind in descriptor strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a logical value is a single element or a sequence of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Scalar,
    Array,
}

/// Parsed logical type of a field.
///
/// Serializes to and from its canonical string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeDescriptor {
    base: BaseKind,
    cardinality: Cardinality,
    nullable: bool,
}

impl TypeDescriptor {
    /// Creates a descriptor from its components.
    #[must_use]
    pub const fn new(base: BaseKind, cardinality: Cardinality, nullable: bool) -> Self {
        Self {
            base,
            cardinality,
            nullable,
        }
    }

    /// Non-nullable scalar of the given kind.
    #[must_use]
    pub const fn scalar(base: BaseKind) -> Self {
        Self::new(base, Cardinality::Scalar, false)
    }

    /// Non-nullable array of the given kind.
    #[must_use]
    pub const fn array(base: BaseKind) -> Self {
        Self::new(base, Cardinality::Array, false)
    }

    /// Returns the same descriptor with the null union added.
    #[must_use]
    pub const fn or_null(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// Parses a canonical descriptor string.
    ///
    /// Matching is exact: no surrounding whitespace, at most one array
    /// marker, at most one null union, array marker first.
    pub fn parse(s: &str) -> DescriptorResult<Self> {
        let (rest, nullable) = match s.strip_suffix(NULL_UNION) {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let (rest, cardinality) = match rest.strip_suffix(ARRAY_MARKER) {
            Some(rest) => (rest, Cardinality::Array),
            None => (rest, Cardinality::Scalar),
        };
        let base =
            BaseKind::from_keyword(rest).ok_or_else(|| DescriptorError::Malformed(s.to_string()))?;

        Ok(Self::new(base, cardinality, nullable))
    }

    #[must_use]
    pub const fn base(&self) -> BaseKind {
        self.base
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.cardinality, Cardinality::Array)
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Checks whether a runtime value conforms to this descriptor.
    ///
    /// Purely a guard: never coerces.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        if value.is_null() && self.nullable {
            return true;
        }

        match self.cardinality {
            Cardinality::Scalar => runtime_kind_of(value) == Some(self.base),
            Cardinality::Array => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| runtime_kind_of(item) == Some(self.base))
            }),
        }
    }

    /// Returns the element type of an array descriptor, keeping nullability.
    ///
    /// `string[] | null` becomes `string | null`.
    pub fn to_singular(&self) -> DescriptorResult<Self> {
        match self.cardinality {
            Cardinality::Array => Ok(Self {
                cardinality: Cardinality::Scalar,
                ..*self
            }),
            Cardinality::Scalar => Err(DescriptorError::NotAnArray(self.to_string())),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())?;
        if self.is_array() {
            f.write_str(ARRAY_MARKER)?;
        }
        if self.nullable {
            f.write_str(NULL_UNION)?;
        }
        Ok(())
    }
}

impl FromStr for TypeDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = DescriptorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TypeDescriptor> for String {
    fn from(descriptor: TypeDescriptor) -> Self {
        descriptor.to_string()
    }
}

/// Returns the scalar kind of a runtime value, if it has one.
///
/// Null, arrays and objects have no scalar kind.
#[must_use]
pub fn runtime_kind_of(value: &Value) -> Option<BaseKind> {
    match value {
        Value::String(_) => Some(BaseKind::String),
        Value::Number(_) => Some(BaseKind::Number),
        Value::Bool(_) => Some(BaseKind::Boolean),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
