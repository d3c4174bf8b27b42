#![allow(dead_code)]

use ornament::{
    core::{
        obs::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink},
        persist::sql::Statement,
    },
    prelude::*,
};
use std::{cell::RefCell, rc::Rc};

#[derive(Model)]
#[model(path = "lifecycle::Comment", identifier = "comments", primary_key = "id")]
struct Comment {
    id: Option<i64>,
    name: Option<String>,
    comment: Option<String>,

    #[field(private)]
    token: Option<String>,
}

#[derive(Model)]
#[model(path = "lifecycle::StateModel")]
struct StateModel {
    #[field(read_only)]
    id: i64,

    #[field(default = "Marijn")]
    name: String,

    #[field(protected, default = "s3cret")]
    secret: String,
}

fn row(name: &str, comment: &str) -> Vec<(&'static str, Value)> {
    vec![("name", Value::from(name)), ("comment", Value::from(comment))]
}

// -----------------------------------------------------------------------------
// Dirty state
// -----------------------------------------------------------------------------

#[test]
fn constructed_models_start_pristine() {
    let account = Model::<StateModel>::from_input([("id", "1")]).expect("construct");

    assert!(account.is_pristine());
    assert!(account.modified_fields().is_empty());
}

#[test]
fn set_marks_dirty_until_marked_pristine() {
    let mut account = Model::<StateModel>::from_input([("id", 1)]).expect("construct");

    account.set("name", "Linus").expect("set");
    assert!(account.is_dirty());
    assert!(account.is_modified("name"));
    assert!(!account.is_modified("id"));
    assert_eq!(account.modified_fields(), vec!["name"]);

    account.mark_pristine();
    assert!(account.is_pristine());
    assert_eq!(account.get("name").expect("name"), Value::from("Linus"));
}

#[test]
fn setting_the_same_value_is_not_a_modification() {
    let mut account = Model::<StateModel>::from_input([("id", 1)]).expect("construct");
    account.set("name", "Marijn").expect("set");

    assert!(account.is_pristine());
}

#[test]
fn populate_leaves_the_snapshot_alone() {
    let mut account = Model::<StateModel>::from_input([("id", 1)]).expect("construct");
    account
        .populate([("id", Value::Int(9)), ("name", Value::from("Grace"))])
        .expect("populate");

    assert_eq!(account.get("id").expect("id"), Value::Int(1), "read-only kept");
    assert!(account.is_modified("name"));
}

#[test]
fn json_rows_construct_models() {
    let doc = serde_json::json!({ "id": "7", "name": "Ada", "secret": "hunter2" });
    let model = Model::<StateModel>::from_input(Value::json_row(doc)).expect("construct");

    assert_eq!(model.get("id").expect("id"), Value::Int(7));
    assert_eq!(model.get("name").expect("name"), Value::from("Ada"));
    assert_eq!(model.get("secret").expect("secret"), Value::from("hunter2"));
    assert!(model.is_pristine());
}

// -----------------------------------------------------------------------------
// Persistence
// -----------------------------------------------------------------------------

#[test]
fn memory_adapter_round_trip() {
    let mut adapter = MemoryAdapter::<Comment>::new();

    let mut model = Model::<Comment>::from_input(row("Marijn", "Hi")).expect("construct");
    adapter.create(&mut model).expect("create");
    assert_eq!(model.get("id").expect("id"), Value::Int(1));
    assert!(model.is_pristine());

    model.set("comment", "Awesome").expect("set");
    assert_eq!(model.modified_fields(), vec!["comment"]);
    adapter.update(&mut model).expect("update");
    assert!(model.is_pristine());

    let found = adapter
        .query(&[("id", Value::Int(1))], &QueryOptions::default())
        .expect("query");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("comment").expect("comment"), Value::from("Awesome"));

    adapter.delete(&model).expect("delete");
    assert!(adapter.is_empty());

    let sql: Vec<String> = adapter
        .statements()
        .into_iter()
        .map(|Statement { sql, .. }| sql)
        .collect();
    assert_eq!(
        sql.first().map(String::as_str),
        Some("INSERT INTO comments (name, comment) VALUES (?, ?)")
    );
    assert!(sql.iter().any(|s| s == "UPDATE comments SET name = ?, comment = ? WHERE id = ?"));
    assert_eq!(
        sql.last().map(String::as_str),
        Some("DELETE FROM comments WHERE id = ?")
    );
}

#[test]
fn private_fields_stay_out_of_persistable_data() {
    let mut model = Model::<Comment>::from_input(row("Marijn", "Hi")).expect("construct");
    model.set("id", 3).expect("set");

    let data = model.persistable_data(&[]).expect("data");
    let names: Vec<_> = data.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["id", "name", "comment"]);

    let with_token = model.persistable_data(&["token"]).expect("data");
    assert_eq!(with_token.last(), Some(&("token", Value::Null)));
}

#[test]
fn query_orders_and_pages() {
    let mut adapter = MemoryAdapter::<Comment>::new();
    for name in ["c", "a", "b"] {
        let mut model = Model::<Comment>::from_input(row(name, "x")).expect("construct");
        adapter.create(&mut model).expect("create");
    }

    let options = QueryOptions::default().order("name DESC").limit(2);
    let names: Vec<Value> = adapter
        .query(&[], &options)
        .expect("query")
        .iter()
        .map(|m| m.get("name").expect("name"))
        .collect();

    assert_eq!(names, vec![Value::from("c"), Value::from("b")]);
}

// -----------------------------------------------------------------------------
// Observability
// -----------------------------------------------------------------------------

#[derive(Default)]
struct Capture(RefCell<Vec<MetricsEvent>>);

impl MetricsSink for Capture {
    fn record(&self, event: MetricsEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn lifecycle_events_reach_a_scoped_sink() {
    let capture = Rc::new(Capture::default());

    with_metrics_sink(Rc::clone(&capture) as Rc<dyn MetricsSink>, || {
        let mut account = Model::<StateModel>::from_input([("id", 1)]).expect("construct");
        account.populate([("id", 2)]).expect("populate");
        account.mark_pristine();
    });

    let events = capture.0.borrow();
    assert!(events.contains(&MetricsEvent::ReadOnlySkipped {
        model_path: "lifecycle::StateModel",
        field: "id",
    }));
    assert!(events.contains(&MetricsEvent::MarkPristine {
        model_path: "lifecycle::StateModel",
    }));
}

#[test]
fn global_counters_track_constructions() {
    metrics_reset_all();

    let _populated = Model::<StateModel>::from_input([("id", 1), ("name", 2)]).expect("construct");
    let _blank = Model::<StateModel>::new();

    let report = metrics_report();
    let counters = report
        .models
        .get("lifecycle::StateModel")
        .expect("account counters");
    assert_eq!(counters.constructions, 2);
    assert_eq!(counters.fields_populated, 2);
    assert_eq!(report.ops.constructions, 2);
}
