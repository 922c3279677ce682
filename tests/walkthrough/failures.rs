//! Faults injected into individual client calls.

use crate::common::*;
use hellotable::{ClientError, Error};

#[test]
fn failed_table_listing_aborts_and_still_closes() {
    let (backend, walkthrough, closes) = faulty(Some("tables"), None, None);

    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not fetch table list"));
    assert!(err.is_retryable());
    assert!(tables(&backend).is_empty());
    assert_eq!(closes.data(), 1);
    assert_eq!(closes.admin(), 1);
}

#[test]
fn failed_table_creation_aborts() {
    let (_backend, walkthrough, _closes) = faulty(Some("create_table"), None, None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not create table Hello-Bigtable"));
}

#[test]
fn failed_family_creation_aborts() {
    let (backend, walkthrough, _closes) = faulty(Some("create_column_family"), None, None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not create column family cf1"));
    // The table created before the failure is left behind
    assert_eq!(tables(&backend), vec!["Hello-Bigtable"]);
}

#[test]
fn failed_bulk_request_aborts() {
    let (_backend, walkthrough, _closes) = faulty(None, Some("apply_bulk"), None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not apply bulk row mutation"));
}

#[test]
fn rejected_row_is_partial_write() {
    let (_backend, walkthrough, _closes) = faulty(None, None, Some(1));
    match walkthrough.run() {
        Err(Error::PartialWrite { failed, total }) => {
            assert_eq!(failed, 1);
            assert_eq!(total, 3);
        }
        other => panic!("expected PartialWrite, got {:?}", other),
    }
}

#[test]
fn failed_read_aborts() {
    let (_backend, walkthrough, _closes) = faulty(None, Some("read_rows"), None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not read row with key testColumn0"));
}

#[test]
fn failed_range_drop_is_logged_not_fatal() {
    let (backend, walkthrough, _closes) = faulty(Some("drop_row_range"), None, None);

    let report = walkthrough.run().unwrap();
    assert!(report
        .drop_error
        .as_deref()
        .unwrap()
        .contains("injected failure in drop_row_range"));
    assert_eq!(report.after_delete.len(), 3);
    assert!(tables(&backend).is_empty());
}

#[test]
fn failed_sampling_aborts_before_table_delete() {
    let (backend, walkthrough, _closes) = faulty(None, Some("sample_row_keys"), None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Err in SampleRowKeys"));
    assert_eq!(tables(&backend), vec!["Hello-Bigtable"]);
}

#[test]
fn failed_table_delete_aborts() {
    let (backend, walkthrough, _closes) = faulty(Some("delete_table"), None, None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not delete table Hello-Bigtable"));
    assert_eq!(tables(&backend), vec!["Hello-Bigtable"]);
}

#[test]
fn close_failure_after_success_is_reported() {
    let (backend, walkthrough, closes) = faulty(Some("close"), None, None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not close admin client"));
    assert_eq!(err.client_error(), Some(&ClientError::Unavailable(
        "injected failure in close".into()
    )));
    // Work itself completed
    assert!(tables(&backend).is_empty());
    assert_eq!(closes.data(), 1);
}

#[test]
fn step_error_wins_over_close_error() {
    let (_backend, walkthrough, _closes) = faulty(Some("delete_table"), Some("close"), None);
    let err = walkthrough.run().unwrap_err();
    assert!(err.to_string().starts_with("Could not delete table"));
}
