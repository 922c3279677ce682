//! Names used by the walkthrough when no override is given.

/// Table created and later deleted by the walkthrough.
pub const TABLE_NAME: &str = "Hello-Bigtable";

/// Column family holding the greetings.
pub const COLUMN_FAMILY_NAME: &str = "cf1";

/// Column qualifier of every greeting cell. Row keys are `<COLUMN_NAME><index>`.
pub const COLUMN_NAME: &str = "testColumn";

/// Values written, one row per greeting.
pub const GREETINGS: [&str; 3] = ["Hello World!", "Hello Cloud Bigtable!", "Hello golang!"];

/// Check whether `item` appears in `list`.
pub fn slice_contains<S: AsRef<str>>(list: &[S], item: &str) -> bool {
    list.iter().any(|s| s.as_ref() == item)
}
