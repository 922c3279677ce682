//! Each walkthrough step on its own.

use crate::common::*;
use hellotable::{ClientError, DataClient, Error, Mutation, RowKey, Timestamp, COLUMN_FAMILY_NAME};

#[test]
fn create_if_not_exists_creates_once() {
    let (backend, walkthrough) = setup();

    assert!(!walkthrough.table_exists().unwrap());
    assert!(walkthrough.create_if_not_exists().unwrap());
    assert!(walkthrough.table_exists().unwrap());
    assert!(!walkthrough.create_if_not_exists().unwrap());
    assert_eq!(tables(&backend), vec!["Hello-Bigtable"]);
}

#[test]
fn create_column_family_reports_schema_before_change() {
    let (_backend, walkthrough) = setup();
    walkthrough.create_if_not_exists().unwrap();

    let (info, created) = walkthrough.create_column_family().unwrap();
    assert!(created);
    assert_eq!(info.name, "Hello-Bigtable");
    assert!(info.families.is_empty());

    let (info, created) = walkthrough.create_column_family().unwrap();
    assert!(!created);
    assert_eq!(info.families, vec![COLUMN_FAMILY_NAME]);
}

#[test]
fn create_column_family_without_table_fails() {
    let (_backend, walkthrough) = setup();
    let err = walkthrough.create_column_family().unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().starts_with("Could not read info for table Hello-Bigtable"));
}

#[test]
fn insert_and_display_reads_back_greetings() {
    let (backend, walkthrough) = setup();
    precreate(&backend);

    let (keys, first, all) = walkthrough.insert_and_display().unwrap();
    assert_eq!(keys, vec![
        RowKey::from("testColumn0"),
        RowKey::from("testColumn1"),
        RowKey::from("testColumn2"),
    ]);
    assert_eq!(first.key, "testColumn0");
    assert_eq!(first.value, "Hello World!");

    let values: Vec<&str> = all.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, vec!["Hello World!", "Hello Cloud Bigtable!", "Hello golang!"]);
}

#[test]
fn insert_without_family_is_partial_write() {
    let (_backend, walkthrough) = setup();
    walkthrough.create_if_not_exists().unwrap();

    match walkthrough.insert_and_display() {
        Err(Error::PartialWrite { failed, total }) => {
            assert_eq!(failed, 3);
            assert_eq!(total, 3);
        }
        other => panic!("expected PartialWrite, got {:?}", other),
    }
}

#[test]
fn display_row_of_missing_row_is_missing_cell() {
    let (backend, walkthrough) = setup();
    precreate(&backend);

    match walkthrough.display_row(&RowKey::from("testColumn9")) {
        Err(Error::MissingCell { key, family }) => {
            assert_eq!(key, "testColumn9");
            assert_eq!(family, "cf1");
        }
        other => panic!("expected MissingCell, got {:?}", other),
    }
}

#[test]
fn display_all_ignores_rows_outside_prefix_and_column() {
    let (backend, walkthrough) = setup();
    precreate(&backend);
    walkthrough.insert_and_display().unwrap();

    let data = backend.data_client();
    let mut other_column = Mutation::new();
    other_column.set("cf1", "other", Timestamp::now(), b"x".to_vec());
    let mut other_prefix = Mutation::new();
    other_prefix.set("cf1", "testColumn", Timestamp::now(), b"y".to_vec());
    let errors = data
        .apply_bulk(
            "Hello-Bigtable",
            &[RowKey::from("testColumn7"), RowKey::from("zzz")],
            &[other_column, other_prefix],
        )
        .unwrap();
    assert!(errors.is_empty());

    let all = walkthrough.display_all().unwrap();
    let keys: Vec<&str> = all.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["testColumn0", "testColumn1", "testColumn2"]);
}

#[test]
fn delete_row_drops_first_greeting() {
    let (backend, walkthrough) = setup();
    precreate(&backend);
    walkthrough.insert_and_display().unwrap();

    let (drop_error, remaining) = walkthrough.delete_row().unwrap();
    assert!(drop_error.is_none());
    let keys: Vec<&str> = remaining.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["testColumn1", "testColumn2"]);
}

#[test]
fn sample_row_keys_ends_with_table_end_marker() {
    let (backend, walkthrough) = setup();
    precreate(&backend);
    walkthrough.insert_and_display().unwrap();

    let samples = walkthrough.sample_row_keys().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].key, RowKey::from("testColumn2"));
    assert!(samples[1].key.is_empty());
    assert!(samples[1].offset_bytes > samples[0].offset_bytes);
}

#[test]
fn delete_table_removes_table() {
    let (backend, walkthrough) = setup();
    precreate(&backend);

    walkthrough.delete_table().unwrap();
    assert!(tables(&backend).is_empty());

    let err = walkthrough.delete_table().unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn close_connections_closes_both_clients() {
    let (_backend, walkthrough) = setup();
    walkthrough.close_connections().unwrap();

    let err = walkthrough.table_exists().unwrap_err();
    assert_eq!(err.client_error(), Some(&ClientError::Closed));
    assert!(walkthrough.sample_row_keys().is_err());

    // Second close reports the data client first
    let err = walkthrough.close_connections().unwrap_err();
    assert!(err.to_string().starts_with("Could not close data operations client"));
}
