//! Client surfaces of the storage service
//!
//! The service splits its API into an administrative plane (tables and
//! column families) and a data plane (reads and writes). Each backend
//! implements both traits; the walkthrough only talks to these traits.

use crate::error::{Error, Result};
use crate::filter::RowFilter;
use crate::mutation::Mutation;
use crate::row_set::RowSet;
use crate::types::{Row, RowKey, SampleKey, TableInfo};

/// Failure of one entry in a bulk apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Position of the entry in the request
    pub index: usize,
    /// Key of the failed row
    pub key: RowKey,
    /// Why the row was not written
    pub error: Error,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} ({}): {}", self.index, self.key, self.error)
    }
}

/// Administrative operations: table and schema management
pub trait AdminClient: Send + Sync {
    /// Names of every table in the instance
    fn tables(&self) -> Result<Vec<String>>;

    /// Create an empty table with no column families
    fn create_table(&self, table: &str) -> Result<()>;

    /// Schema summary of a table
    fn table_info(&self, table: &str) -> Result<TableInfo>;

    /// Add a column family to a table
    fn create_column_family(&self, table: &str, family: &str) -> Result<()>;

    /// Delete every row whose key starts with `prefix`
    fn drop_row_range(&self, table: &str, prefix: &[u8]) -> Result<()>;

    /// Delete a table and all of its data
    fn delete_table(&self, table: &str) -> Result<()>;

    /// Release the connection; later calls fail with [`Error::Closed`]
    fn close(&self) -> Result<()>;
}

/// Data-plane operations: reads, writes, sampling
pub trait DataClient: Send + Sync {
    /// Visit the selected rows in key order
    ///
    /// `visit` returns `false` to stop early. Rows left empty by `filter`
    /// are skipped.
    fn read_rows(
        &self,
        table: &str,
        rows: &RowSet,
        filter: Option<&RowFilter>,
        visit: &mut dyn FnMut(Row) -> bool,
    ) -> Result<()>;

    /// Read a single row, `None` when it does not exist or is filtered empty
    fn read_row(&self, table: &str, key: &RowKey, filter: Option<&RowFilter>) -> Result<Option<Row>> {
        let mut found = None;
        self.read_rows(table, &RowSet::Keys(vec![key.clone()]), filter, &mut |row| {
            found = Some(row);
            false
        })?;
        Ok(found)
    }

    /// Apply one mutation per key
    ///
    /// The outer error covers the request as a whole. Per-row failures are
    /// returned in the vector, which is empty when every row was written.
    fn apply_bulk(
        &self,
        table: &str,
        keys: &[RowKey],
        mutations: &[Mutation],
    ) -> Result<Vec<RowError>>;

    /// Approximate split points of the table
    fn sample_row_keys(&self, table: &str) -> Result<Vec<SampleKey>>;

    /// Release the connection; later calls fail with [`Error::Closed`]
    fn close(&self) -> Result<()>;
}

/// Reject a bulk apply whose keys and mutations do not pair up
pub fn check_bulk_shape(keys: &[RowKey], mutations: &[Mutation]) -> Result<()> {
    if keys.len() != mutations.len() {
        return Err(Error::InvalidArgument(format!(
            "mismatched bulk apply: {} keys, {} mutations",
            keys.len(),
            mutations.len()
        )));
    }
    Ok(())
}
