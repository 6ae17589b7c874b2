//! Process-wide conversion registry.

use std::sync::OnceLock;

use fieldcast_types::{ExternalKind, TypeDescriptor};
use tracing::debug;

use crate::conversion::{conversion_for, Conversion, Converter};
use crate::family::LogicalFamily;

/// Immutable table of conversions, one per (family, kind) pair.
///
/// Built once and only read afterwards, so it can be shared between threads
/// without synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRegistry {
    table: [[Conversion; ExternalKind::COUNT]; LogicalFamily::COUNT],
}

impl ConversionRegistry {
    /// Materializes the standard conversion matrix.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = [[Conversion::Unsupported; ExternalKind::COUNT]; LogicalFamily::COUNT];
        for family in LogicalFamily::ALL {
            for kind in ExternalKind::ALL {
                table[family.index()][kind.index()] = conversion_for(family, kind);
            }
        }

        let registry = Self { table };
        debug!(
            supported_pairs = registry.supported_pairs(),
            "built conversion registry"
        );
        registry
    }

    /// The shared registry, built on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ConversionRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::standard)
    }

    /// Policy for a pair, including [`Conversion::Unsupported`].
    #[must_use]
    pub const fn conversion(&self, family: LogicalFamily, kind: ExternalKind) -> Conversion {
        self.table[family.index()][kind.index()]
    }

    /// Converter for a pair, or `None` when the pair is unsupported.
    #[must_use]
    pub fn lookup(&self, family: LogicalFamily, kind: ExternalKind) -> Option<Converter> {
        let conversion = self.conversion(family, kind);
        conversion
            .is_supported()
            .then(|| Converter::new(kind, conversion))
    }

    /// Converter for a descriptor stored in a field of the given kind.
    #[must_use]
    pub fn resolve(&self, descriptor: &TypeDescriptor, kind: ExternalKind) -> Option<Converter> {
        LogicalFamily::of(descriptor).and_then(|family| self.lookup(family, kind))
    }

    /// External kinds a family can be stored in.
    #[must_use]
    pub fn supported_kinds(&self, family: LogicalFamily) -> Vec<ExternalKind> {
        ExternalKind::ALL
            .into_iter()
            .filter(|kind| self.conversion(family, *kind).is_supported())
            .collect()
    }

    /// Number of supported (family, kind) pairs.
    #[must_use]
    pub fn supported_pairs(&self) -> usize {
        self.table
            .iter()
            .flatten()
            .filter(|c| c.is_supported())
            .count()
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
