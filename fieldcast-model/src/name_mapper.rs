//! Field-name mapping between logical and external records.
//!
//! A logical field is stored under its own name, under one other external
//! name, or spread across an ordered list of external fields that each hold
//! one element of the logical array.

use fieldcast_types::{DescriptorError, TypeDescriptor};
use serde_json::Value;

/// Where a logical field's value lives in the external store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldNameMapping {
    /// Same name, same cardinality.
    #[default]
    Identity,
    /// One external field under a different name. For array types it holds
    /// the whole collection.
    Single(String),
    /// One external field per array element, in order.
    Spread(Vec<String>),
}

/// One external field a logical field reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTarget {
    external: String,
    expected: TypeDescriptor,
}

impl FieldTarget {
    /// External field name.
    #[must_use]
    pub fn external(&self) -> &str {
        &self.external
    }

    /// Type the external field's value coerces to. For spread fields this
    /// is the element type of the logical array.
    #[must_use]
    pub const fn expected(&self) -> TypeDescriptor {
        self.expected
    }
}

/// A logical value could not be split across a spread mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistributeError {
    #[error("expected an array to spread across {expected} fields")]
    NotAnArray { expected: usize },

    #[error("got {found} values to spread across {expected} fields")]
    LengthMismatch { expected: usize, found: usize },
}

/// A declared logical field together with its resolved external targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    descriptor: TypeDescriptor,
    mapping: FieldNameMapping,
    targets: Vec<FieldTarget>,
}

impl FieldSpec {
    pub(crate) fn resolve(
        name: String,
        descriptor: TypeDescriptor,
        mapping: FieldNameMapping,
    ) -> Result<Self, DescriptorError> {
        let targets = match &mapping {
            FieldNameMapping::Identity => vec![FieldTarget {
                external: name.clone(),
                expected: descriptor,
            }],
            FieldNameMapping::Single(external) => vec![FieldTarget {
                external: external.clone(),
                expected: descriptor,
            }],
            FieldNameMapping::Spread(externals) => {
                let element = descriptor.to_singular()?;
                externals
                    .iter()
                    .map(|external| FieldTarget {
                        external: external.clone(),
                        expected: element,
                    })
                    .collect()
            }
        };

        Ok(Self {
            name,
            descriptor,
            mapping,
            targets,
        })
    }

    /// Logical field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared logical type.
    #[must_use]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    #[must_use]
    pub const fn mapping(&self) -> &FieldNameMapping {
        &self.mapping
    }

    /// External fields backing this logical field, in mapping order.
    #[must_use]
    pub fn targets(&self) -> &[FieldTarget] {
        &self.targets
    }

    #[must_use]
    pub const fn is_spread(&self) -> bool {
        matches!(self.mapping, FieldNameMapping::Spread(_))
    }

    /// Rebuilds the logical value from the per-target values read from the
    /// store, given in target order.
    ///
    /// Spread fields concatenate into an array (order kept, duplicates and
    /// nulls kept as elements); other fields take their single value.
    #[must_use]
    pub fn assemble(&self, values: Vec<Value>) -> Value {
        if self.is_spread() {
            Value::Array(values)
        } else {
            values.into_iter().next().unwrap_or(Value::Null)
        }
    }

    /// Splits a logical value into per-target values for writing.
    ///
    /// A spread field accepts `null` (written to every target) or an array
    /// with exactly one element per target. Lengths that differ are rejected
    /// rather than truncated or padded.
    pub fn distribute(&self, value: &Value) -> Result<Vec<(&FieldTarget, Value)>, DistributeError> {
        if !self.is_spread() {
            return Ok(self.targets.iter().map(|t| (t, value.clone())).collect());
        }

        let expected = self.targets.len();
        if value.is_null() {
            return Ok(self.targets.iter().map(|t| (t, Value::Null)).collect());
        }

        let items = value
            .as_array()
            .ok_or(DistributeError::NotAnArray { expected })?;
        if items.len() != expected {
            return Err(DistributeError::LengthMismatch {
                expected,
                found: items.len(),
            });
        }

        Ok(self.targets.iter().zip(items.iter().cloned()).collect())
    }
}
