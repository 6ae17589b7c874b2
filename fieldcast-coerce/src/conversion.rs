//! The (logical family × external kind) conversion matrix.
//!
//! [`conversion_for`] matches exhaustively over both closed enums with no
//! wildcard arms, so adding a family or a kind does not compile until every
//! new pair is given a policy (possibly [`Conversion::Unsupported`]).

use fieldcast_types::{runtime_kind_of, BaseKind, ExternalKind};
use serde_json::Value;

use crate::datetime;
use crate::error::ConvertError;
use crate::family::LogicalFamily;

/// How values of one (family, kind) pair are converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Free text; absent becomes `""` or `null`.
    Text { nullable: bool },
    /// A scalar id stored as a one-element linked-record array.
    LinkedScalar { nullable: bool },
    /// A linked-record array stored as is.
    LinkedArray { nullable: bool },
    /// Read-only lookup unwrapped to a single element of `base` kind.
    LookupScalar { base: BaseKind, nullable: bool },
    /// Read-only lookup read as an array of `base` elements.
    LookupArray { base: BaseKind, nullable: bool },
    /// Writable number; non-nullable values are required.
    Numeric { nullable: bool },
    /// Read-only number computed by the store.
    ComputedNumeric { nullable: bool },
    /// ISO-8601 string on both sides.
    IsoDateTime { nullable: bool },
    /// Unix seconds on the logical side, ISO-8601 on the external side.
    EpochDateTime { nullable: bool },
    /// Boolean; absent becomes `false` or `null`.
    Checkbox { nullable: bool },
    /// No conversion exists for this pair.
    Unsupported,
}

/// The conversion policy for a pair.
#[must_use]
pub const fn conversion_for(family: LogicalFamily, kind: ExternalKind) -> Conversion {
    use ExternalKind as K;
    use LogicalFamily as F;

    let nullable = family.is_nullable();
    match family {
        F::String | F::NullableString => match kind {
            K::SingleLineText | K::Email | K::Url | K::LongText | K::RichText | K::PhoneNumber => {
                Conversion::Text { nullable }
            }
            K::LinkedRecords => Conversion::LinkedScalar { nullable },
            K::DateTime => Conversion::IsoDateTime { nullable },
            K::Lookup => Conversion::LookupScalar {
                base: BaseKind::String,
                nullable,
            },
            K::Checkbox
            | K::Number
            | K::Percent
            | K::Currency
            | K::Rating
            | K::Duration
            | K::Count
            | K::AutoNumber => Conversion::Unsupported,
        },
        F::Number | F::NullableNumber => match kind {
            K::Number | K::Percent | K::Currency | K::Rating | K::Duration => {
                Conversion::Numeric { nullable }
            }
            K::Count | K::AutoNumber => Conversion::ComputedNumeric { nullable },
            K::DateTime => Conversion::EpochDateTime { nullable },
            K::Lookup => Conversion::LookupScalar {
                base: BaseKind::Number,
                nullable,
            },
            K::SingleLineText
            | K::Email
            | K::Url
            | K::LongText
            | K::RichText
            | K::PhoneNumber
            | K::Checkbox
            | K::LinkedRecords => Conversion::Unsupported,
        },
        F::Boolean | F::NullableBoolean => match kind {
            K::Checkbox => Conversion::Checkbox { nullable },
            K::Lookup => Conversion::LookupScalar {
                base: BaseKind::Boolean,
                nullable,
            },
            K::SingleLineText
            | K::Email
            | K::Url
            | K::LongText
            | K::RichText
            | K::PhoneNumber
            | K::Number
            | K::Percent
            | K::Currency
            | K::Rating
            | K::Duration
            | K::Count
            | K::AutoNumber
            | K::LinkedRecords
            | K::DateTime => Conversion::Unsupported,
        },
        F::StringArray | F::NullableStringArray => match kind {
            K::LinkedRecords => Conversion::LinkedArray { nullable },
            K::Lookup => Conversion::LookupArray {
                base: BaseKind::String,
                nullable,
            },
            K::SingleLineText
            | K::Email
            | K::Url
            | K::LongText
            | K::RichText
            | K::PhoneNumber
            | K::Checkbox
            | K::Number
            | K::Percent
            | K::Currency
            | K::Rating
            | K::Duration
            | K::Count
            | K::AutoNumber
            | K::DateTime => Conversion::Unsupported,
        },
    }
}

impl Conversion {
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Whether writes through this conversion always fail.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::LookupScalar { .. } | Self::LookupArray { .. } | Self::ComputedNumeric { .. }
        )
    }
}

/// A registered conversion bound to the external kind it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converter {
    kind: ExternalKind,
    conversion: Conversion,
}

impl Converter {
    pub(crate) const fn new(kind: ExternalKind, conversion: Conversion) -> Self {
        Self { kind, conversion }
    }

    #[must_use]
    pub const fn kind(&self) -> ExternalKind {
        self.kind
    }

    #[must_use]
    pub const fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Converts a logical value into its external form.
    ///
    /// `None` means the logical value is absent; it is treated like `null`.
    pub fn to_external(&self, value: Option<&Value>) -> Result<Value, ConvertError> {
        let kind = self.kind;
        let value = value.filter(|v| !v.is_null());

        match self.conversion {
            Conversion::Text { nullable } => {
                Ok(value.cloned().unwrap_or_else(|| empty_text(nullable)))
            }
            Conversion::LinkedScalar { nullable } => Ok(wrap_link(value, nullable)),
            Conversion::LinkedArray { nullable } => {
                Ok(value.cloned().unwrap_or_else(|| empty_array(nullable)))
            }
            Conversion::Numeric { nullable } => required(kind, value, nullable),
            Conversion::IsoDateTime { nullable } => date_time(value, nullable, |v| {
                v.as_str().and_then(datetime::canonicalize).map(Value::String)
            }),
            Conversion::EpochDateTime { nullable } => date_time(value, nullable, |v| {
                v.as_f64()
                    .and_then(datetime::epoch_seconds_to_iso)
                    .map(Value::String)
            }),
            Conversion::Checkbox { nullable } => {
                Ok(value.cloned().unwrap_or_else(|| empty_bool(nullable)))
            }
            Conversion::LookupScalar { .. }
            | Conversion::LookupArray { .. }
            | Conversion::ComputedNumeric { .. } => Err(ConvertError::ReadOnly { kind }),
            Conversion::Unsupported => Err(ConvertError::Unsupported { kind }),
        }
    }

    /// Converts a raw external value into its logical form.
    ///
    /// `None` means the store omitted the field; it is treated like `null`.
    pub fn from_external(&self, value: Option<&Value>) -> Result<Value, ConvertError> {
        let kind = self.kind;
        let value = value.filter(|v| !v.is_null());

        match self.conversion {
            Conversion::Text { nullable } => {
                Ok(value.cloned().unwrap_or_else(|| empty_text(nullable)))
            }
            Conversion::LinkedScalar { nullable } => {
                unwrap_single(kind, value, BaseKind::String, nullable)
            }
            Conversion::LookupScalar { base, nullable } => {
                unwrap_single(kind, value, base, nullable)
            }
            Conversion::LinkedArray { nullable } => {
                Ok(value.cloned().unwrap_or_else(|| empty_array(nullable)))
            }
            Conversion::LookupArray { base, nullable } => match value {
                None if nullable => Ok(Value::Null),
                None => Err(unexpected(kind, "array", &Value::Null)),
                Some(Value::Array(items)) => {
                    let bad = items
                        .iter()
                        .find(|item| runtime_kind_of(item) != Some(base));
                    if let Some(bad) = bad {
                        return Err(unexpected(kind, base.as_str(), bad));
                    }
                    Ok(Value::Array(items.clone()))
                }
                Some(other) => Err(unexpected(kind, "array", other)),
            },
            Conversion::Numeric { nullable } | Conversion::ComputedNumeric { nullable } => {
                required(kind, value, nullable)
            }
            Conversion::IsoDateTime { nullable } => date_time(value, nullable, |v| {
                v.as_str().and_then(datetime::canonicalize).map(Value::String)
            }),
            Conversion::EpochDateTime { nullable } => date_time(value, nullable, |v| {
                v.as_str()
                    .and_then(datetime::iso_to_epoch_seconds)
                    .map(Value::from)
            }),
            Conversion::Checkbox { nullable } => {
                Ok(value.cloned().unwrap_or_else(|| empty_bool(nullable)))
            }
            Conversion::Unsupported => Err(ConvertError::Unsupported { kind }),
        }
    }
}

fn empty_text(nullable: bool) -> Value {
    if nullable {
        Value::Null
    } else {
        Value::String(String::new())
    }
}

fn empty_array(nullable: bool) -> Value {
    if nullable {
        Value::Null
    } else {
        Value::Array(Vec::new())
    }
}

/// Wraps a record id in a link array. A nullable link written as `""`
/// clears the link instead of storing an empty id.
fn wrap_link(value: Option<&Value>, nullable: bool) -> Value {
    let value = value.filter(|v| !(nullable && v.as_str() == Some("")));
    Value::Array(value.cloned().into_iter().collect())
}

fn empty_bool(nullable: bool) -> Value {
    if nullable {
        Value::Null
    } else {
        Value::Bool(false)
    }
}

fn required(
    kind: ExternalKind,
    value: Option<&Value>,
    nullable: bool,
) -> Result<Value, ConvertError> {
    match value {
        Some(v) => Ok(v.clone()),
        None if nullable => Ok(Value::Null),
        None => Err(ConvertError::RequiredMissing { kind }),
    }
}

/// Date-time conversions share their null handling: `null` passes through
/// for nullable types, and is an invalid stamp otherwise.
fn date_time<F>(value: Option<&Value>, nullable: bool, convert: F) -> Result<Value, ConvertError>
where
    F: FnOnce(&Value) -> Option<Value>,
{
    match value {
        None if nullable => Ok(Value::Null),
        None => Err(ConvertError::InvalidDateTime("missing value".into())),
        Some(v) => convert(v).ok_or_else(|| ConvertError::InvalidDateTime(v.to_string())),
    }
}

/// Reads a scalar out of an array that must hold exactly one entry.
/// An empty or absent array is `null` for nullable types.
fn unwrap_single(
    kind: ExternalKind,
    value: Option<&Value>,
    base: BaseKind,
    nullable: bool,
) -> Result<Value, ConvertError> {
    let items: &[Value] = match value {
        None => &[],
        Some(Value::Array(items)) => items,
        Some(other) => return Err(unexpected(kind, "array", other)),
    };

    match items {
        [] if nullable => Ok(Value::Null),
        [item] if runtime_kind_of(item) == Some(base) => Ok(item.clone()),
        [item] => Err(unexpected(kind, base.as_str(), item)),
        _ => Err(ConvertError::Arity {
            kind,
            found: items.len(),
        }),
    }
}

fn unexpected(kind: ExternalKind, expected: &str, found: &Value) -> ConvertError {
    ConvertError::UnexpectedValue {
        kind,
        expected: expected.to_string(),
        found: json_type_name(found),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
