use crate::{
    model::{FieldKind, PrimitiveKind, Visibility, metadata},
    obs::{metrics_report, metrics_reset_all},
    test_fixtures::{CoreModel, DecoratedModel, MyTableModel, OverlapA, OverlapB, PlainModel},
    traits::{DecoratorType, ModelKind},
    types::DateTime,
    value::Value,
};
use crate::{decorate::is_registered, test_fixtures::SubtractOne};
use std::{sync::Arc, thread};

#[test]
fn metadata_is_built_once_and_shared() {
    let first = metadata::<CoreModel>();
    let second = metadata::<CoreModel>();

    assert!(Arc::ptr_eq(&first, &second), "second access must hit the cache");
    assert_eq!(*first, *second);
}

#[test]
fn mutating_a_copy_does_not_touch_the_cache() {
    let mut copy = (*metadata::<CoreModel>()).clone();
    copy.identifier = "changed".to_string();
    copy.primary_key.clear();

    let cached = metadata::<CoreModel>();
    assert_eq!(cached.identifier, "core_model");
    assert_eq!(cached.primary_key, vec!["id"]);
}

#[test]
fn concurrent_first_access_publishes_one_table() {
    let tables: Vec<_> = (0..8)
        .map(|_| thread::spawn(metadata::<MyTableModel>))
        .map(|handle| handle.join().expect("metadata thread panicked"))
        .collect();

    for table in &tables[1..] {
        assert!(Arc::ptr_eq(&tables[0], table));
    }
}

#[test]
fn first_build_records_an_event() {
    // the cache is process-wide, so only a kind no other test touches
    // can observe its own build
    struct FreshModel;

    impl ModelKind for FreshModel {
        const PATH: &'static str = "model_tests::FreshModel";

        fn declare(model: &mut crate::model::ModelBuilder) {
            model.typed::<i64>("id");
        }
    }

    metrics_reset_all();
    let _ = metadata::<FreshModel>();
    let _ = metadata::<FreshModel>();

    let report = metrics_report();
    assert_eq!(report.models["model_tests::FreshModel"].metadata_builds, 1);
}

#[test]
fn overlapping_field_names_do_not_leak_between_kinds() {
    let a = metadata::<OverlapA>();
    let b = metadata::<OverlapB>();

    let shared_a = a.field("shared").expect("OverlapA declares shared");
    let shared_b = b.field("shared").expect("OverlapB declares shared");

    assert_eq!(shared_a.kind, FieldKind::Primitive(PrimitiveKind::Int));
    assert!(!shared_a.nullable);
    assert_eq!(shared_b.kind, FieldKind::Primitive(PrimitiveKind::Text));
    assert!(shared_b.nullable);
    assert_eq!(shared_b.visibility, Visibility::Protected);

    assert!(a.field("only_a").is_some());
    assert!(b.field("only_a").is_none(), "OverlapB must not see OverlapA's fields");
}

#[test]
fn decoration_table_excludes_private_and_opted_out_fields() {
    let core = metadata::<CoreModel>();
    let names: Vec<_> = core.decorated_fields().collect();
    assert_eq!(names, vec!["id", "name"]);
    assert!(core.field("invisible").is_some(), "private fields still hold state");

    let plain = metadata::<PlainModel>();
    assert!(plain.decoration("raw").is_none());
    assert!(plain.field("raw").is_some_and(|f| !f.decorate));
}

#[test]
fn field_flags_follow_declarations() {
    let core = metadata::<CoreModel>();

    let id = core.field("id").expect("id");
    assert!(id.read_only);
    assert!(id.default.is_none());
    assert!(!id.is_persistable());

    let name = core.field("name").expect("name");
    assert_eq!(name.default, Some(Value::from("Marijn")));
    assert!(name.is_persistable());

    let slots: Vec<_> = core.fields().map(|f| f.name).collect();
    assert_eq!(slots, vec!["id", "name", "invisible"]);
    assert_eq!(core.slot("invisible"), Some(2));
}

#[test]
fn object_fields_register_their_types() {
    let decorated = metadata::<DecoratedModel>();
    let field = decorated.field("point").expect("point");

    assert_eq!(field.construct_args, vec![Value::Int(1), Value::from("two")]);
    assert!(is_registered(SubtractOne::PATH));
    assert!(is_registered(DateTime::PATH), "DateTime is built in");
}

#[test]
fn virtual_getters_keep_the_last_registration() {
    let decorated = metadata::<DecoratedModel>();
    let names: Vec<_> = decorated.virtual_names().collect();

    assert_eq!(names, vec!["hidden_plus_one", "virtual_property"]);
}

#[test]
fn identifier_and_primary_key_defaults() {
    let table = metadata::<MyTableModel>();

    assert_eq!(table.identifier, "my_table_model");
    assert_eq!(table.primary_key, vec!["id"]);
}

#[test]
fn redeclaring_a_field_replaces_it_in_place() {
    let mut builder = crate::model::ModelBuilder::new("model_tests::Redeclared");
    builder.typed::<i64>("a");
    builder.typed::<i64>("b");
    builder.typed::<String>("a").read_only();

    let meta = builder.build();
    let names: Vec<_> = meta.fields().map(|f| f.name).collect();

    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(
        meta.field("a").map(|f| f.kind),
        Some(FieldKind::Primitive(PrimitiveKind::Text))
    );
    assert_eq!(meta.identifier, "redeclared");
}

#[test]
fn slot_typing_converts_lossless_text_only() {
    assert_eq!(PrimitiveKind::Int.admit(Value::from(" 12 ")), Value::Int(12));
    assert_eq!(PrimitiveKind::Int.admit(Value::from("12a")), Value::from("12a"));
    assert_eq!(PrimitiveKind::Float.admit(Value::Int(2)), Value::Float(2.0));
    assert_eq!(PrimitiveKind::Float.admit(Value::from("NaN")), Value::from("NaN"));
    assert_eq!(PrimitiveKind::Float.admit(Value::from("inf")), Value::from("inf"));
    assert_eq!(PrimitiveKind::Bool.admit(Value::from("1")), Value::Bool(true));
    assert_eq!(PrimitiveKind::Bool.admit(Value::Int(7)), Value::Int(7));
    assert_eq!(PrimitiveKind::Text.admit(Value::Int(7)), Value::Int(7));
    assert_eq!(PrimitiveKind::Int.admit(Value::Null), Value::Null);
}
