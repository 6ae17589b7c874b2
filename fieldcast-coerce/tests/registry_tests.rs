use std::collections::BTreeSet;

use fieldcast_coerce::{conversion_for, Conversion, ConversionRegistry, LogicalFamily};
use fieldcast_types::{BaseKind, ExternalKind, TypeDescriptor};
use pretty_assertions::assert_eq;

// ── Families ─────────────────────────────────────────────────────

#[test]
fn families_cover_every_scalar_and_string_arrays() {
    for family in LogicalFamily::ALL {
        assert_eq!(LogicalFamily::of(&family.descriptor()), Some(family));
    }
    assert_eq!(LogicalFamily::ALL.len(), LogicalFamily::COUNT);
}

#[test]
fn number_and_boolean_arrays_have_no_family() {
    for base in [BaseKind::Number, BaseKind::Boolean] {
        assert_eq!(LogicalFamily::of(&TypeDescriptor::array(base)), None);
        assert_eq!(LogicalFamily::of(&TypeDescriptor::array(base).or_null()), None);
    }
}

#[test]
fn family_display_is_canonical_descriptor() {
    assert_eq!(LogicalFamily::NullableStringArray.to_string(), "string[] | null");
    assert_eq!(LogicalFamily::Number.to_string(), "number");
}

// ── Matrix ───────────────────────────────────────────────────────

#[test]
fn registry_mirrors_conversion_matrix() {
    let registry = ConversionRegistry::standard();
    for family in LogicalFamily::ALL {
        for kind in ExternalKind::ALL {
            assert_eq!(registry.conversion(family, kind), conversion_for(family, kind));
            assert_eq!(
                registry.lookup(family, kind).is_some(),
                conversion_for(family, kind).is_supported()
            );
        }
    }
}

#[test]
fn supported_pair_count() {
    // 9 string, 9 number, 2 boolean and 2 string-array kinds, each nullable or not.
    assert_eq!(ConversionRegistry::global().supported_pairs(), 44);
}

#[test]
fn supported_kinds_per_family() {
    let registry = ConversionRegistry::global();
    assert_eq!(
        registry.supported_kinds(LogicalFamily::Boolean),
        vec![ExternalKind::Checkbox, ExternalKind::Lookup]
    );
    assert_eq!(
        registry.supported_kinds(LogicalFamily::NullableStringArray),
        vec![ExternalKind::LinkedRecords, ExternalKind::Lookup]
    );

    let numbers: BTreeSet<_> = registry
        .supported_kinds(LogicalFamily::Number)
        .into_iter()
        .collect();
    assert!(numbers.contains(&ExternalKind::DateTime));
    assert!(numbers.contains(&ExternalKind::AutoNumber));
    assert!(!numbers.contains(&ExternalKind::SingleLineText));
}

#[test]
fn lookup_conversions_carry_base_kind() {
    assert_eq!(
        conversion_for(LogicalFamily::NullableBoolean, ExternalKind::Lookup),
        Conversion::LookupScalar {
            base: BaseKind::Boolean,
            nullable: true
        }
    );
    assert_eq!(
        conversion_for(LogicalFamily::StringArray, ExternalKind::Lookup),
        Conversion::LookupArray {
            base: BaseKind::String,
            nullable: false
        }
    );
}

#[test]
fn read_only_kinds_have_read_only_conversions() {
    for family in LogicalFamily::ALL {
        for kind in ExternalKind::ALL {
            let conversion = conversion_for(family, kind);
            if conversion.is_supported() {
                assert_eq!(
                    conversion.is_read_only(),
                    kind.is_read_only(),
                    "{family} × {kind}"
                );
            }
        }
    }
}

#[test]
fn unsupported_pairs() {
    assert_eq!(
        conversion_for(LogicalFamily::Boolean, ExternalKind::Number),
        Conversion::Unsupported
    );
    assert_eq!(
        conversion_for(LogicalFamily::String, ExternalKind::Checkbox),
        Conversion::Unsupported
    );
    assert_eq!(
        conversion_for(LogicalFamily::StringArray, ExternalKind::SingleLineText),
        Conversion::Unsupported
    );
}

// ── Resolution ───────────────────────────────────────────────────

#[test]
fn resolve_by_descriptor() {
    let registry = ConversionRegistry::global();
    let converter = registry
        .resolve(&TypeDescriptor::scalar(BaseKind::String).or_null(), ExternalKind::LinkedRecords)
        .unwrap();
    assert_eq!(converter.kind(), ExternalKind::LinkedRecords);
    assert_eq!(
        converter.conversion(),
        Conversion::LinkedScalar { nullable: true }
    );

    assert!(registry
        .resolve(&TypeDescriptor::array(BaseKind::Number), ExternalKind::Lookup)
        .is_none());
}

#[test]
fn global_registry_is_shared() {
    let a = ConversionRegistry::global();
    let b = ConversionRegistry::global();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a, &ConversionRegistry::default());
}

#[test]
fn registry_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConversionRegistry>();

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| ConversionRegistry::global().supported_pairs()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 44);
    }
}
