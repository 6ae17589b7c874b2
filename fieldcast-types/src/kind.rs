//! Storage kinds reported by the external record store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DescriptorError;

/// The representation the external store uses for a field.
///
/// Serialized with the store's own identifiers. Every external value is
/// implicitly nullable regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExternalKind {
    SingleLineText,
    Email,
    Url,
    #[serde(rename = "multilineText")]
    LongText,
    RichText,
    PhoneNumber,
    Checkbox,
    Number,
    Percent,
    Currency,
    Rating,
    Duration,
    Count,
    AutoNumber,
    #[serde(rename = "multipleRecordLinks")]
    LinkedRecords,
    DateTime,
    #[serde(rename = "multipleLookupValues")]
    Lookup,
}

impl ExternalKind {
    /// Number of kinds.
    pub const COUNT: usize = 17;

    /// Every kind, in declaration order.
    pub const ALL: [ExternalKind; Self::COUNT] = [
        Self::SingleLineText,
        Self::Email,
        Self::Url,
        Self::LongText,
        Self::RichText,
        Self::PhoneNumber,
        Self::Checkbox,
        Self::Number,
        Self::Percent,
        Self::Currency,
        Self::Rating,
        Self::Duration,
        Self::Count,
        Self::AutoNumber,
        Self::LinkedRecords,
        Self::DateTime,
        Self::Lookup,
    ];

    /// Position of this kind in [`ExternalKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The store's identifier for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleLineText => "singleLineText",
            Self::Email => "email",
            Self::Url => "url",
            Self::LongText => "multilineText",
            Self::RichText => "richText",
            Self::PhoneNumber => "phoneNumber",
            Self::Checkbox => "checkbox",
            Self::Number => "number",
            Self::Percent => "percent",
            Self::Currency => "currency",
            Self::Rating => "rating",
            Self::Duration => "duration",
            Self::Count => "count",
            Self::AutoNumber => "autoNumber",
            Self::LinkedRecords => "multipleRecordLinks",
            Self::DateTime => "dateTime",
            Self::Lookup => "multipleLookupValues",
        }
    }

    /// Whether the store computes this field's value itself.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Count | Self::AutoNumber | Self::Lookup)
    }

    /// Whether values of this kind are free text.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(
            self,
            Self::SingleLineText
                | Self::Email
                | Self::Url
                | Self::LongText
                | Self::RichText
                | Self::PhoneNumber
        )
    }
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExternalKind {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DescriptorError::UnknownKind(s.to_string()))
    }
}
