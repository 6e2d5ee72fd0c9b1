use super::*;
use crate::injection_point::Member;
use crate::type_descriptor::{TypeParseError, TypeParseErrorKind, TypeViolation, MAX_NESTING};
use std::collections::BTreeSet;

fn string_type() -> TypeDescriptor {
    TypeDescriptor::named("java.lang.String")
}

fn qualifier_a() -> Qualifier {
    Qualifier::new("QualifierA")
}

fn ip1() -> Arc<InjectionPoint> {
    Arc::new(InjectionPoint::new(
        TypeDescriptor::parameterized("Event", vec![TypeDescriptor::named("java.lang.Integer")]),
        Member::Field {
            declaring_type: "com.shop.Counter".to_string(),
            name: "ticks".to_string(),
        },
    ))
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn empty_qualifiers_yield_only_any() {
    let metadata = EventMetadata::new(string_type(), None, Vec::new()).unwrap();
    assert_eq!(metadata.event_type(), &string_type());
    assert!(metadata.injection_point().is_none());
    assert_eq!(metadata.qualifiers().len(), 1);
    assert!(metadata.qualifiers().contains(&Qualifier::any()));
}

#[test]
fn explicit_any_is_not_double_counted() {
    let integer = TypeDescriptor::named("java.lang.Integer");
    let ip = ip1();
    let metadata = EventMetadata::new(
        integer.clone(),
        Some(ip.clone()),
        vec![qualifier_a(), Qualifier::any()],
    )
    .unwrap();

    let expected: QualifierSet = vec![qualifier_a(), Qualifier::any()].into();
    assert_eq!(metadata.qualifiers(), &expected);
    assert_eq!(metadata.qualifiers().len(), 2);
    assert_eq!(metadata.event_type(), &integer);
    assert!(Arc::ptr_eq(metadata.injection_point().unwrap(), &ip));
}

#[test]
fn duplicate_qualifiers_collapse() {
    let metadata = EventMetadata::new(
        string_type(),
        None,
        vec![qualifier_a(), qualifier_a(), Qualifier::any(), Qualifier::any()],
    )
    .unwrap();
    assert_eq!(metadata.qualifiers().len(), 2);
}

#[test]
fn array_and_collection_entry_points_agree() {
    let qualifiers = [qualifier_a(), Qualifier::new("Updated")];
    let from_array = EventMetadata::from_array(string_type(), Some(ip1()), &qualifiers).unwrap();
    let from_set = EventMetadata::new(
        string_type(),
        Some(ip1()),
        qualifiers.iter().cloned().collect::<BTreeSet<_>>(),
    )
    .unwrap();
    assert_eq!(from_array, from_set);
    assert_eq!(from_array.qualifiers().len(), 3);
}

#[test]
fn members_distinguish_qualifiers() {
    let metadata = EventMetadata::new(
        string_type(),
        None,
        vec![
            Qualifier::new("Named").with_member("value", "a"),
            Qualifier::new("Named").with_member("value", "b"),
        ],
    )
    .unwrap();
    assert_eq!(metadata.qualifiers().len(), 3);
}

#[test]
fn from_type_name_parses_the_type() {
    let metadata =
        EventMetadata::from_type_name("java.util.List<java.lang.String>", None, Vec::new())
            .unwrap();
    assert_eq!(
        metadata.event_type(),
        &TypeDescriptor::parameterized("java.util.List", vec![string_type()])
    );
}

#[test]
fn from_type_name_reports_parse_errors() {
    let err = EventMetadata::from_type_name("List<", None, Vec::new()).unwrap_err();
    assert!(matches!(err, MetadataError::Parse(_)));
}

#[test]
fn invalid_type_fails_fast() {
    let err = EventMetadata::new(TypeDescriptor::named(""), None, Vec::new()).unwrap_err();
    assert_eq!(
        err,
        MetadataError::InvalidType {
            ty: String::new(),
            reason: TypeViolation::EmptyName,
        }
    );

    let err = EventMetadata::new(TypeDescriptor::wildcard(), None, Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        MetadataError::InvalidType {
            reason: TypeViolation::MisplacedWildcard,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "invalid event type ?: wildcard outside of a type argument"
    );
}

#[test]
fn deeply_nested_type_name_is_rejected() {
    let deep = format!("{}X{}", "L<".repeat(200_000), ">".repeat(200_000));
    let err = EventMetadata::from_type_name(&deep, None, Vec::new()).unwrap_err();
    assert_eq!(
        err,
        MetadataError::Parse(TypeParseError {
            offset: 2 * MAX_NESTING,
            kind: TypeParseErrorKind::TooDeep,
        })
    );
}

#[test]
fn deeply_nested_type_is_rejected() {
    let deep = (0..MAX_NESTING).fold(TypeDescriptor::named("int"), |ty, _| {
        TypeDescriptor::array(ty)
    });
    let err = EventMetadata::new(deep, None, Vec::new()).unwrap_err();
    match err {
        MetadataError::InvalidType { ty, reason } => {
            assert_eq!(reason, TypeViolation::TooDeep);
            assert!(ty.starts_with("...[]"));
        }
        other => panic!("expected InvalidType, got {:?}", other),
    }
}

#[test]
fn invalid_qualifier_member_is_rejected() {
    let bad = Qualifier::new("Source").with_member("value", TypeDescriptor::named(""));
    let err = EventMetadata::new(string_type(), None, vec![qualifier_a(), bad]).unwrap_err();
    assert_eq!(
        err,
        MetadataError::InvalidQualifier {
            qualifier: "@Source(value=.class)".to_string(),
            reason: TypeViolation::EmptyName,
        }
    );
}

#[test]
fn invalid_injection_point_is_rejected() {
    let ip = Arc::new(InjectionPoint::new(
        TypeDescriptor::wildcard(),
        Member::Field {
            declaring_type: "com.shop.Counter".to_string(),
            name: "ticks".to_string(),
        },
    ));
    let err = EventMetadata::new(string_type(), Some(ip), Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        MetadataError::InvalidInjectionPoint {
            reason: TypeViolation::MisplacedWildcard,
            ..
        }
    ));
}

// ============================================================================
// Accessors and immutability
// ============================================================================

#[test]
fn accessors_are_idempotent() {
    let metadata = EventMetadata::new(string_type(), Some(ip1()), vec![qualifier_a()]).unwrap();
    assert_eq!(metadata.qualifiers(), metadata.qualifiers());
    assert_eq!(metadata.event_type(), metadata.event_type());
    assert_eq!(metadata.injection_point(), metadata.injection_point());
}

#[test]
fn cloned_qualifiers_are_independent() {
    let metadata = EventMetadata::new(string_type(), None, vec![qualifier_a()]).unwrap();
    let before = metadata.qualifiers().clone();

    let extended = metadata
        .qualifiers()
        .clone()
        .with(Qualifier::new("Extra"));
    assert_eq!(extended.len(), 3);

    assert_eq!(metadata.qualifiers(), &before);
    assert_eq!(metadata.qualifiers().len(), 2);
}

#[test]
fn injection_point_is_shared_not_owned() {
    let ip = ip1();
    let metadata = EventMetadata::new(string_type(), Some(Arc::clone(&ip)), Vec::new()).unwrap();
    assert_eq!(Arc::strong_count(&ip), 2);
    drop(metadata);
    assert_eq!(Arc::strong_count(&ip), 1);
}

#[test]
fn metadata_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EventMetadata>();
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn display_without_injection_point() {
    let metadata = EventMetadata::new(string_type(), None, vec![qualifier_a()]).unwrap();
    assert_eq!(
        metadata.to_string(),
        "EventMetadata(type: java.lang.String, qualifiers: {@Any, @QualifierA}, injection point: none)"
    );
}

#[test]
fn display_with_injection_point() {
    let metadata = EventMetadata::new(string_type(), Some(ip1()), Vec::new()).unwrap();
    assert_eq!(
        metadata.to_string(),
        "EventMetadata(type: java.lang.String, qualifiers: {@Any}, injection point: \
         [field] Event<java.lang.Integer> com.shop.Counter.ticks)"
    );
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn deserialization_restores_any() {
    let json = serde_json::json!({
        "type": { "kind": "named", "name": "java.lang.String" },
        "qualifiers": [{ "name": "QualifierA" }],
    });
    let metadata: EventMetadata = serde_json::from_value(json).unwrap();
    assert_eq!(metadata.qualifiers().len(), 2);
    assert!(metadata.qualifiers().contains(&Qualifier::any()));
    assert!(metadata.injection_point().is_none());
}

#[test]
fn deserialization_rejects_missing_type() {
    let json = serde_json::json!({ "qualifiers": [] });
    let err = serde_json::from_value::<EventMetadata>(json).unwrap_err();
    assert!(err.to_string().contains("event metadata has no type"));
}

#[test]
fn deserialization_rejects_invalid_type() {
    let json = serde_json::json!({
        "type": { "kind": "parameterized", "raw": "List", "arguments": [] },
    });
    let err = serde_json::from_value::<EventMetadata>(json).unwrap_err();
    assert!(err.to_string().contains("has no type arguments"));
}

#[test]
fn deserialization_rejects_invalid_class_member() {
    let json = serde_json::json!({
        "type": { "kind": "named", "name": "java.lang.String" },
        "qualifiers": [{
            "name": "Source",
            "members": [["value", { "class": { "kind": "named", "name": "" } }]],
        }],
    });
    let err = serde_json::from_value::<EventMetadata>(json).unwrap_err();
    assert!(err.to_string().contains("invalid qualifier @Source"));
}

#[test]
fn serialized_form_reloads_equal() {
    let metadata = EventMetadata::new(string_type(), Some(ip1()), vec![qualifier_a()]).unwrap();
    let json = serde_json::to_string(&metadata).unwrap();
    let back: EventMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(back, metadata);
}

// ============================================================================
// Properties
// ============================================================================

use proptest::prelude::*;

fn arb_qualifier() -> impl Strategy<Value = Qualifier> {
    (
        prop_oneof![Just("Any".to_string()), "[A-D]"],
        proptest::option::of(0..3i64),
    )
        .prop_map(|(name, value)| match value {
            Some(v) => Qualifier::new(name).with_member("value", v),
            None => Qualifier::new(name),
        })
}

proptest! {
    #[test]
    fn qualifiers_are_supplied_union_any(
        supplied in proptest::collection::vec(arb_qualifier(), 0..12)
    ) {
        let metadata = EventMetadata::new(string_type(), None, supplied.clone()).unwrap();

        let mut expected: BTreeSet<Qualifier> = supplied.into_iter().collect();
        expected.insert(Qualifier::any());

        prop_assert_eq!(metadata.qualifiers().len(), expected.len());
        prop_assert!(metadata.qualifiers().iter().all(|q| expected.contains(q)));
        prop_assert!(!metadata.qualifiers().is_empty());
    }

    #[test]
    fn supplied_order_does_not_matter(
        supplied in proptest::collection::vec(arb_qualifier(), 0..12)
    ) {
        let mut reversed = supplied.clone();
        reversed.reverse();
        let forward = EventMetadata::from_array(string_type(), None, &supplied).unwrap();
        let backward = EventMetadata::new(string_type(), None, reversed).unwrap();
        prop_assert_eq!(forward, backward);
    }
}
