use std::collections::BTreeMap;
use std::sync::Arc;

use fieldcast_coerce::{CoerceError, ConversionRegistry, ErrorKind, RecordCoercer};
use fieldcast_model::{
    DistributeError, ExternalTable, LogicalRecord, PartialRecord, RawRecord, TableDefinition,
    TableSchema,
};
use fieldcast_types::{ExternalKind, TypeDescriptor};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn cohort_class() -> TableSchema {
    TableSchema::try_from(
        TableDefinition::new("cohort class")
            .field("Name", "string")
            .field("Facilitator", "string")
            .field("Participants", "string[]")
            .field("Start", "number | null")
            .field("Sessions", "number")
            .field("Zoom", "string | null")
            .field("Active", "boolean")
            .field("Hosts", "string[]")
            .map_to("Facilitator", "[>] Facilitator")
            .map_to("Participants", "[>] Participants")
            .map_to("Zoom", "[>] Zoom")
            .spread("Hosts", ["Host 1", "Host 2"]),
    )
    .unwrap()
}

fn live_table() -> Arc<ExternalTable> {
    Arc::new(
        ExternalTable::new("cohort class")
            .with_field("Name", ExternalKind::SingleLineText)
            .with_field("[>] Facilitator", ExternalKind::LinkedRecords)
            .with_field("[>] Participants", ExternalKind::LinkedRecords)
            .with_field("Start", ExternalKind::DateTime)
            .with_field("Sessions", ExternalKind::Count)
            .with_field("[>] Zoom", ExternalKind::LinkedRecords)
            .with_field("Active", ExternalKind::Checkbox)
            .with_field("Host 1", ExternalKind::SingleLineText)
            .with_field("Host 2", ExternalKind::SingleLineText),
    )
}

fn raw_record() -> RawRecord {
    RawRecord::new("rec1", live_table())
        .with("Name", "Intro cohort")
        .with("[>] Facilitator", json!(["recF"]))
        .with("[>] Participants", json!(["recP1", "recP2"]))
        .with("Start", "2024-03-01T08:30:00.000Z")
        .with("Sessions", 4)
        .with("[>] Zoom", json!([]))
        .with("Active", true)
        .with("Host 1", "Ada")
        .with("Host 2", "Grace")
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn coercer() -> RecordCoercer<'static> {
    RecordCoercer::standard()
}

// ── Reading ──────────────────────────────────────────────────────

#[test]
fn reads_full_record() {
    let record = coercer().from_external(&cohort_class(), &raw_record()).unwrap();

    assert_eq!(
        record,
        LogicalRecord {
            id: "rec1".into(),
            fields: fields(json!({
                "Name": "Intro cohort",
                "Facilitator": "recF",
                "Participants": ["recP1", "recP2"],
                "Start": 1_709_281_800,
                "Sessions": 4,
                "Zoom": null,
                "Active": true,
                "Hosts": ["Ada", "Grace"],
            })),
        }
    );
}

#[test]
fn reads_defaults_for_omitted_fields() {
    let raw = RawRecord::new("rec2", live_table())
        .with("[>] Facilitator", json!(["recF"]))
        .with("Sessions", 0);

    let record = coercer().from_external(&cohort_class(), &raw).unwrap();

    assert_eq!(record.id, "rec2");
    assert_eq!(record.get_str("Name"), Some(""));
    assert_eq!(record.get_str_array("Participants"), Some(vec![]));
    assert_eq!(record.get("Start"), Some(&Value::Null));
    assert_eq!(record.get("Zoom"), Some(&Value::Null));
    assert_eq!(record.get_bool("Active"), Some(false));
    assert_eq!(record.get("Hosts"), Some(&json!(["", ""])));
}

#[test]
fn read_fails_on_missing_required_number() {
    let raw = RawRecord::new("rec3", live_table()).with("[>] Facilitator", json!(["recF"]));

    let err = coercer().from_external(&cohort_class(), &raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequiredValueMissing);
    assert_eq!(err.field(), Some("Sessions"));
}

#[test]
fn read_fails_on_empty_required_link() {
    let raw = raw_record().with("[>] Facilitator", json!([]));

    let err = coercer().from_external(&cohort_class(), &raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    assert_eq!(err.field(), Some("Facilitator"));
    assert!(err.to_string().contains("cohort class.Facilitator"));
}

#[test]
fn read_fails_when_store_lacks_field() {
    let table = Arc::new(
        ExternalTable::new("cohort class").with_field("Name", ExternalKind::SingleLineText),
    );
    let raw = RawRecord::new("rec1", table).with("Name", "x");

    let err = coercer().from_external(&cohort_class(), &raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownExternalType);
}

#[test]
fn read_fails_on_incompatible_kind() {
    let table = ExternalTable::new("cohort class").with_field("Active", ExternalKind::Number);
    let schema =
        TableSchema::try_from(TableDefinition::new("cohort class").field("Active", "boolean"))
            .unwrap();
    let raw = RawRecord::new("rec1", Arc::new(table)).with("Active", 1);

    let err = coercer().from_external(&schema, &raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleKind);
    match err {
        CoerceError::IncompatibleKind {
            field,
            expected,
            found,
            ..
        } => {
            assert_eq!(field, "Active");
            assert_eq!(expected, TypeDescriptor::parse("boolean").unwrap());
            assert_eq!(found, ExternalKind::Number);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn number_arrays_are_incompatible_with_every_kind() {
    let schema =
        TableSchema::try_from(TableDefinition::new("scores").field("Scores", "number[]")).unwrap();
    let table = Arc::new(ExternalTable::new("scores").with_field("Scores", ExternalKind::Lookup));
    let raw = RawRecord::new("rec1", table).with("Scores", json!([1, 2]));

    let err = coercer().from_external(&schema, &raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleKind);
}

#[test]
fn scan_reads_every_record() {
    let records = vec![raw_record(), raw_record().with("Name", "Second")];
    let read = coercer().scan(&cohort_class(), &records).unwrap();

    assert_eq!(read.len(), 2);
    assert_eq!(read[1].get_str("Name"), Some("Second"));
}

#[test]
fn scan_stops_at_first_bad_record() {
    let records = vec![raw_record(), raw_record().with("Sessions", Value::Null)];
    let err = coercer().scan(&cohort_class(), &records).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequiredValueMissing);
}

// ── Writing ──────────────────────────────────────────────────────

#[test]
fn partial_update_touches_only_present_fields() {
    let update = PartialRecord::new().with_id("rec1").set("Name", "Renamed");

    let out = coercer()
        .to_external(&cohort_class(), &update, &*live_table())
        .unwrap();

    assert_eq!(out.id.as_deref(), Some("rec1"));
    assert_eq!(out.fields, fields(json!({ "Name": "Renamed" })));
}

#[test]
fn writes_mapped_and_spread_fields() {
    let update = PartialRecord::new()
        .set("Facilitator", "recF")
        .set("Zoom", Value::Null)
        .set("Start", 0)
        .set("Hosts", json!(["Ada", "Grace"]));

    let out = coercer()
        .to_external(&cohort_class(), &update, &*live_table())
        .unwrap();

    assert_eq!(out.id, None);
    assert_eq!(
        out.fields,
        fields(json!({
            "[>] Facilitator": ["recF"],
            "[>] Zoom": [],
            "Start": "1970-01-01T00:00:00.000Z",
            "Host 1": "Ada",
            "Host 2": "Grace",
        }))
    );
}

#[test]
fn read_only_write_fails() {
    let update = PartialRecord::new().set("Name", "x").set("Sessions", 5);

    let err = coercer()
        .to_external(&cohort_class(), &update, &*live_table())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadOnlyField);
    assert_eq!(err.field(), Some("Sessions"));
}

#[test]
fn type_guard_runs_before_any_conversion() {
    // Sessions alone would fail as read-only; the guard on Zoom wins.
    let update = PartialRecord::new().set("Sessions", 5).set("Zoom", 7);

    let err = coercer()
        .to_external(&cohort_class(), &update, &*live_table())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatchOnWrite);
    assert_eq!(err.field(), Some("Zoom"));
}

#[test]
fn guard_rejects_null_for_non_nullable() {
    let update = PartialRecord::new().set("Name", Value::Null);

    let err = coercer()
        .to_external(&cohort_class(), &update, &*live_table())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatchOnWrite);
}

#[test]
fn spread_length_mismatch_fails_fast() {
    let update = PartialRecord::new().set("Hosts", json!(["Ada"]));

    let err = coercer()
        .to_external(&cohort_class(), &update, &*live_table())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    match err {
        CoerceError::Spread { source, .. } => {
            assert_eq!(
                source,
                DistributeError::LengthMismatch {
                    expected: 2,
                    found: 1
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undeclared_keys_are_ignored() {
    let update = PartialRecord::new().set("Name", "x").set("Notes", "ignored");

    let out = coercer()
        .to_external(&cohort_class(), &update, &*live_table())
        .unwrap();
    assert_eq!(out.fields, fields(json!({ "Name": "x" })));
}

#[test]
fn empty_update_is_empty_payload() {
    let out = coercer()
        .to_external(&cohort_class(), &PartialRecord::new(), &*live_table())
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn write_accepts_plain_kind_maps() {
    let kinds: BTreeMap<String, ExternalKind> =
        [("Name".to_string(), ExternalKind::LongText)].into_iter().collect();
    let update = PartialRecord::new().set("Name", "x");

    let out = coercer().to_external(&cohort_class(), &update, &kinds).unwrap();
    assert_eq!(out.get("Name"), Some(&json!("x")));

    let update = PartialRecord::new().set("Active", true);
    let err = coercer().to_external(&cohort_class(), &update, &kinds).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownExternalType);
}

// ── Round trip ───────────────────────────────────────────────────

#[test]
fn writable_fields_round_trip() {
    let schema = cohort_class();
    let raw = raw_record();
    let coercer = coercer();

    let mut update = coercer.from_external(&schema, &raw).unwrap().into_partial();
    update.fields.remove("Sessions");
    let out = coercer.to_external(&schema, &update, &raw).unwrap();

    let mut expected = raw.fields.clone();
    expected.remove("Sessions");
    assert_eq!(out.id.as_deref(), Some("rec1"));
    assert_eq!(out.fields, expected);
}

#[test]
fn nullable_spread_reads_null_elements_it_cannot_write_back() {
    // Empty links read as null elements; the array guard rejects them on write.
    let schema = TableSchema::try_from(
        TableDefinition::new("t")
            .field("Slots", "string[] | null")
            .spread("Slots", ["Slot 1", "Slot 2"]),
    )
    .unwrap();
    let table = Arc::new(
        ExternalTable::new("t")
            .with_field("Slot 1", ExternalKind::LinkedRecords)
            .with_field("Slot 2", ExternalKind::LinkedRecords),
    );
    let raw = RawRecord::new("rec1", table)
        .with("Slot 1", json!(["recA"]))
        .with("Slot 2", json!([]));
    let coercer = coercer();

    let record = coercer.from_external(&schema, &raw).unwrap();
    assert_eq!(record.get("Slots"), Some(&json!(["recA", null])));

    let err = coercer
        .to_external(&schema, &record.into_partial(), &raw)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatchOnWrite);
    assert_eq!(err.field(), Some("Slots"));

    let cleared = PartialRecord::new().set("Slots", Value::Null);
    let out = coercer.to_external(&schema, &cleared, &raw).unwrap();
    assert_eq!(out.fields, fields(json!({ "Slot 1": [], "Slot 2": [] })));
}

// ── Declarations ─────────────────────────────────────────────────

#[test]
fn coerces_with_json_declarations() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let schema = TableSchema::from_json(
        r#"{
            "name": "sessions",
            "schema": { "Title": "string | null", "Cohort": "string" },
            "mappings": { "Cohort": "[>] Cohort" }
        }"#,
    )
    .unwrap();
    let table = ExternalTable::from_json(
        r#"{
            "name": "sessions",
            "fields": [
                { "name": "Title", "type": "richText" },
                { "name": "[>] Cohort", "type": "multipleLookupValues" }
            ]
        }"#,
    )
    .unwrap();
    let raw = RawRecord::new("recS", Arc::new(table)).with("[>] Cohort", json!(["Intro"]));

    let registry = ConversionRegistry::standard();
    let record = RecordCoercer::new(&registry).from_external(&schema, &raw).unwrap();
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({ "id": "recS", "Title": null, "Cohort": "Intro" })
    );
}
