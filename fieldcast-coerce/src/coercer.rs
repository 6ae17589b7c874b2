//! Whole-record coercion.
//!
//! Reading walks every field the schema declares; writing walks only the
//! fields present in the update, so absent keys are left untouched in the
//! store. Either direction fails as a whole on the first bad field.

use fieldcast_model::{
    ExternalFieldSet, ExternalRecord, FieldKinds, FieldSpec, FieldTarget, LogicalRecord,
    PartialRecord, TableSchema,
};
use serde_json::{Map, Value};
use tracing::{trace, trace_span};

use crate::conversion::Converter;
use crate::error::{CoerceError, CoerceResult};
use crate::registry::ConversionRegistry;

/// Converts records between their external and logical shapes.
#[derive(Debug, Clone, Copy)]
pub struct RecordCoercer<'r> {
    registry: &'r ConversionRegistry,
}

impl RecordCoercer<'static> {
    /// A coercer backed by the shared global registry.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(ConversionRegistry::global())
    }
}

impl Default for RecordCoercer<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'r> RecordCoercer<'r> {
    #[must_use]
    pub const fn new(registry: &'r ConversionRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &'r ConversionRegistry {
        self.registry
    }

    /// Converts a raw store record into a logical record.
    ///
    /// The id is copied unchanged.
    pub fn from_external<R>(&self, schema: &TableSchema, record: &R) -> CoerceResult<LogicalRecord>
    where
        R: ExternalRecord + ?Sized,
    {
        let _span =
            trace_span!("from_external", table = schema.name(), id = record.id()).entered();

        let mut fields = Map::new();
        for spec in schema.fields() {
            let mut values = Vec::with_capacity(spec.targets().len());
            for target in spec.targets() {
                let converter = self.converter(schema, spec, target, record)?;
                let value = converter
                    .from_external(record.field(target.external()))
                    .map_err(|source| CoerceError::Convert {
                        table: schema.name().to_string(),
                        field: spec.name().to_string(),
                        external: target.external().to_string(),
                        source,
                    })?;
                values.push(value);
            }
            fields.insert(spec.name().to_string(), spec.assemble(values));
        }

        trace!(fields = fields.len(), "read record");
        Ok(LogicalRecord {
            id: record.id().to_string(),
            fields,
        })
    }

    /// Converts a batch of raw records, failing on the first bad one.
    pub fn scan<'a, R, I>(
        &self,
        schema: &TableSchema,
        records: I,
    ) -> CoerceResult<Vec<LogicalRecord>>
    where
        R: ExternalRecord + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        records
            .into_iter()
            .map(|record| self.from_external(schema, record))
            .collect()
    }

    /// Converts a (possibly partial) logical record into an update payload.
    ///
    /// Every present value is checked against its declared type before any
    /// external field is resolved. Keys the schema does not declare are
    /// ignored.
    pub fn to_external<K>(
        &self,
        schema: &TableSchema,
        record: &PartialRecord,
        kinds: &K,
    ) -> CoerceResult<ExternalFieldSet>
    where
        K: FieldKinds + ?Sized,
    {
        let _span =
            trace_span!("to_external", table = schema.name(), id = ?record.id).entered();

        let present: Vec<(&FieldSpec, &Value)> = schema
            .fields()
            .iter()
            .filter_map(|spec| record.fields.get(spec.name()).map(|value| (spec, value)))
            .collect();

        for (spec, value) in &present {
            if !spec.descriptor().matches(value) {
                return Err(CoerceError::TypeMismatchOnWrite {
                    table: schema.name().to_string(),
                    field: spec.name().to_string(),
                    expected: spec.descriptor(),
                    value: (*value).clone(),
                });
            }
        }

        let mut fields = Map::new();
        for (spec, value) in present {
            let parts = spec.distribute(value).map_err(|source| CoerceError::Spread {
                table: schema.name().to_string(),
                field: spec.name().to_string(),
                source,
            })?;

            for (target, part) in parts {
                let converter = self.converter(schema, spec, target, kinds)?;
                let external = converter.to_external(Some(&part)).map_err(|source| {
                    CoerceError::Convert {
                        table: schema.name().to_string(),
                        field: spec.name().to_string(),
                        external: target.external().to_string(),
                        source,
                    }
                })?;
                fields.insert(target.external().to_string(), external);
            }
        }

        trace!(fields = fields.len(), "wrote record");
        Ok(ExternalFieldSet {
            id: record.id.clone(),
            fields,
        })
    }

    /// Finds the converter for one external target, using the kind the
    /// store currently reports for it.
    fn converter<K>(
        &self,
        schema: &TableSchema,
        spec: &FieldSpec,
        target: &FieldTarget,
        kinds: &K,
    ) -> CoerceResult<Converter>
    where
        K: FieldKinds + ?Sized,
    {
        let kind = kinds
            .kind_of(target.external())
            .ok_or_else(|| CoerceError::UnknownExternalType {
                table: schema.name().to_string(),
                field: spec.name().to_string(),
                external: target.external().to_string(),
            })?;

        self.registry
            .resolve(&target.expected(), kind)
            .ok_or_else(|| CoerceError::IncompatibleKind {
                table: schema.name().to_string(),
                field: spec.name().to_string(),
                external: target.external().to_string(),
                expected: target.expected(),
                found: kind,
            })
    }
}
