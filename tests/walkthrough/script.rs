//! The whole script end to end.

use crate::common::*;
use hellotable::prelude::*;
use hellotable::MemoryBackend;

#[test]
fn run_on_empty_instance() {
    let (backend, walkthrough) = setup();

    let report = walkthrough.run().unwrap();

    assert!(report.created_table);
    assert!(report.created_family);
    assert_eq!(report.table_info.as_ref().unwrap().families.len(), 0);
    assert_eq!(report.written, vec!["testColumn0", "testColumn1", "testColumn2"]);
    assert_eq!(report.first_row.as_ref().unwrap().value, "Hello World!");
    assert_eq!(report.all_rows.len(), 3);
    assert!(report.drop_error.is_none());
    assert_eq!(report.after_delete.len(), 2);
    assert!(report.samples.last().unwrap().key.is_empty());

    // The table is gone and the walkthrough's clients are closed
    assert!(tables(&backend).is_empty());
    assert!(walkthrough.table_exists().is_err());
}

#[test]
fn run_reuses_existing_table_and_family() {
    let (backend, walkthrough) = setup();
    precreate(&backend);

    let report = walkthrough.run().unwrap();
    assert!(!report.created_table);
    assert!(!report.created_family);
    assert_eq!(report.table_info.unwrap().families, vec!["cf1"]);
}

#[test]
fn run_with_custom_schema() {
    let backend = MemoryBackend::new();
    let schema = Schema {
        table: "greetings".into(),
        family: "g".into(),
        column: "hello".into(),
    };
    let walkthrough = Walkthrough::new(
        Box::new(backend.admin_client()),
        Box::new(backend.data_client()),
        schema,
    );

    let report = walkthrough.run().unwrap();
    assert_eq!(report.written, vec!["hello0", "hello1", "hello2"]);
    let keys: Vec<&str> = report.after_delete.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["hello1", "hello2"]);
}

#[test]
fn run_with_metacharacters_in_column_name() {
    let backend = MemoryBackend::new();
    let schema = Schema {
        table: "greetings".into(),
        family: "g".into(),
        column: "hello+v1".into(),
    };
    let walkthrough = Walkthrough::new(
        Box::new(backend.admin_client()),
        Box::new(backend.data_client()),
        schema,
    );

    let report = walkthrough.run().unwrap();
    assert_eq!(report.first_row.unwrap().key, "hello+v10");
    assert_eq!(report.all_rows.len(), 3);
    let keys: Vec<&str> = report.after_delete.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["hello+v11", "hello+v12"]);
}

#[test]
fn connect_memory_backend_runs() {
    let opts = ConnectOptions::new("p", "i").backend(Backend::Memory);
    let walkthrough = Walkthrough::connect(&opts, Schema::default()).unwrap();
    let report = walkthrough.run().unwrap();
    assert_eq!(report.all_rows.len(), 3);
}

#[test]
fn connect_rejects_missing_instance() {
    let opts = ConnectOptions::new("p", "").backend(Backend::Memory);
    let err = Walkthrough::connect(&opts, Schema::default()).err().unwrap();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(err.to_string(), "The instance flag is required.");
}

#[test]
fn in_memory_walkthroughs_are_isolated() {
    let first = Walkthrough::in_memory(Schema::default());
    let second = Walkthrough::in_memory(Schema::default());
    first.create_if_not_exists().unwrap();
    assert!(!second.table_exists().unwrap());
}

#[test]
fn report_serializes_to_json() {
    let (_backend, walkthrough) = setup();
    let report = walkthrough.run().unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["first_row"]["key"], "testColumn0");
    assert_eq!(value["all_rows"].as_array().unwrap().len(), 3);
    assert_eq!(value["table_info"]["name"], "Hello-Bigtable");
}
