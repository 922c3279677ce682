//! Admin and data clients over a shared [`MemoryStore`]

use crate::filter::CompiledFilter;
use crate::store::MemoryStore;
use hellotable_core::{
    check_bulk_shape, AdminClient, DataClient, Error, Mutation, Result, Row, RowError, RowFilter,
    RowKey, RowSet, SampleKey, TableInfo,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Rows between consecutive split points reported by `sample_row_keys`.
pub const DEFAULT_SAMPLE_EVERY: usize = 2;

/// One in-process instance; clients created from it see the same tables.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    store: Arc<MemoryStore>,
    sample_every: usize,
}

impl MemoryBackend {
    /// A fresh, empty instance
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            sample_every: DEFAULT_SAMPLE_EVERY,
        }
    }

    /// Report a split point every `rows` rows.
    pub fn with_sample_every(mut self, rows: usize) -> Self {
        self.sample_every = rows.max(1);
        self
    }

    /// New admin client over this instance, open until closed
    pub fn admin_client(&self) -> MemoryAdminClient {
        MemoryAdminClient {
            store: Arc::clone(&self.store),
            closed: AtomicBool::new(false),
        }
    }

    /// New data client over this instance, open until closed
    pub fn data_client(&self) -> MemoryDataClient {
        MemoryDataClient {
            store: Arc::clone(&self.store),
            sample_every: self.sample_every,
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_open(closed: &AtomicBool) -> Result<()> {
    if closed.load(Ordering::Acquire) {
        return Err(Error::Closed);
    }
    Ok(())
}

fn close_once(closed: &AtomicBool) -> Result<()> {
    if closed.swap(true, Ordering::AcqRel) {
        return Err(Error::Closed);
    }
    Ok(())
}

/// Administrative client of a [`MemoryBackend`].
#[derive(Debug)]
pub struct MemoryAdminClient {
    store: Arc<MemoryStore>,
    closed: AtomicBool,
}

impl AdminClient for MemoryAdminClient {
    fn tables(&self) -> Result<Vec<String>> {
        ensure_open(&self.closed)?;
        Ok(self.store.table_names())
    }

    fn create_table(&self, table: &str) -> Result<()> {
        ensure_open(&self.closed)?;
        self.store.create_table(table)
    }

    fn table_info(&self, table: &str) -> Result<TableInfo> {
        ensure_open(&self.closed)?;
        self.store.table_info(table)
    }

    fn create_column_family(&self, table: &str, family: &str) -> Result<()> {
        ensure_open(&self.closed)?;
        self.store.create_family(table, family)
    }

    fn drop_row_range(&self, table: &str, prefix: &[u8]) -> Result<()> {
        ensure_open(&self.closed)?;
        if prefix.is_empty() {
            return Err(Error::InvalidArgument("row key prefix must not be empty".into()));
        }
        let handle = self.store.table(table)?;
        let dropped = handle.write().drop_prefix(prefix);
        debug!(table, dropped, "dropped row range");
        Ok(())
    }

    fn delete_table(&self, table: &str) -> Result<()> {
        ensure_open(&self.closed)?;
        self.store.delete_table(table)
    }

    fn close(&self) -> Result<()> {
        close_once(&self.closed)
    }
}

/// Data-plane client of a [`MemoryBackend`].
#[derive(Debug)]
pub struct MemoryDataClient {
    store: Arc<MemoryStore>,
    sample_every: usize,
    closed: AtomicBool,
}

impl DataClient for MemoryDataClient {
    fn read_rows(
        &self,
        table: &str,
        rows: &RowSet,
        filter: Option<&RowFilter>,
        visit: &mut dyn FnMut(Row) -> bool,
    ) -> Result<()> {
        ensure_open(&self.closed)?;
        let filter = CompiledFilter::compile(filter)?;
        let handle = self.store.table(table)?;
        // Snapshot under the lock so the visitor may call back into the client.
        let selected = handle.read().rows_matching(|key| rows.contains(key));
        for row in selected {
            let cells = filter.apply(row.cells);
            if cells.is_empty() {
                continue;
            }
            if !visit(Row { key: row.key, cells }) {
                break;
            }
        }
        Ok(())
    }

    fn apply_bulk(
        &self,
        table: &str,
        keys: &[RowKey],
        mutations: &[Mutation],
    ) -> Result<Vec<RowError>> {
        ensure_open(&self.closed)?;
        check_bulk_shape(keys, mutations)?;
        let handle = self.store.table(table)?;
        let mut guard = handle.write();
        let errors: Vec<RowError> = keys
            .iter()
            .zip(mutations)
            .enumerate()
            .filter_map(|(index, (key, mutation))| {
                guard.apply(key, mutation).err().map(|error| RowError {
                    index,
                    key: key.clone(),
                    error,
                })
            })
            .collect();
        debug!(table, rows = keys.len(), failed = errors.len(), "applied bulk mutation");
        Ok(errors)
    }

    fn sample_row_keys(&self, table: &str) -> Result<Vec<SampleKey>> {
        ensure_open(&self.closed)?;
        let handle = self.store.table(table)?;
        let samples = handle.read().samples(self.sample_every);
        Ok(samples)
    }

    fn close(&self) -> Result<()> {
        close_once(&self.closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hellotable_core::{RowRange, Timestamp};

    fn setup() -> (MemoryAdminClient, MemoryDataClient) {
        let backend = MemoryBackend::new();
        let admin = backend.admin_client();
        admin.create_table("t").unwrap();
        admin.create_column_family("t", "cf1").unwrap();
        (admin, backend.data_client())
    }

    fn greeting(value: &str) -> Mutation {
        let mut m = Mutation::new();
        m.set("cf1", "testColumn", Timestamp::from_micros(1000), value.as_bytes().to_vec());
        m
    }

    fn write(data: &MemoryDataClient, rows: &[(&str, &str)]) {
        let keys: Vec<RowKey> = rows.iter().map(|(k, _)| RowKey::from(*k)).collect();
        let muts: Vec<Mutation> = rows.iter().map(|(_, v)| greeting(v)).collect();
        assert!(data.apply_bulk("t", &keys, &muts).unwrap().is_empty());
    }

    #[test]
    fn test_clients_share_store() {
        let backend = MemoryBackend::new();
        backend.admin_client().create_table("shared").unwrap();
        assert_eq!(backend.admin_client().tables().unwrap(), vec!["shared"]);
        assert!(backend.data_client().sample_row_keys("shared").is_ok());
    }

    #[test]
    fn test_sample_every_controls_split_points() {
        let backend = MemoryBackend::new().with_sample_every(1);
        let admin = backend.admin_client();
        admin.create_table("t").unwrap();
        admin.create_column_family("t", "cf1").unwrap();
        let data = backend.data_client();
        write(&data, &[("a", "1"), ("b", "2"), ("c", "3")]);

        let keys: Vec<String> = data
            .sample_row_keys("t")
            .unwrap()
            .iter()
            .map(|s| s.key.to_string())
            .collect();
        assert_eq!(keys, vec!["b", "c", ""]);

        // Zero is treated as one
        let every_zero = MemoryBackend::new().with_sample_every(0);
        assert_eq!(every_zero.sample_every, 1);
    }

    #[test]
    fn test_read_row_and_missing_row() {
        let (_admin, data) = setup();
        write(&data, &[("testColumn0", "Hello World!")]);

        let row = data
            .read_row("t", &RowKey::from("testColumn0"), Some(&RowFilter::column("testColumn")))
            .unwrap()
            .unwrap();
        assert_eq!(row.first_value("cf1"), Some(&b"Hello World!"[..]));

        let missing = data.read_row("t", &RowKey::from("nope"), None).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_read_rows_prefix_and_early_stop() {
        let (_admin, data) = setup();
        write(&data, &[("a", "x"), ("testColumn0", "0"), ("testColumn1", "1"), ("testColumn2", "2")]);

        let mut seen = Vec::new();
        data.read_rows("t", &RowSet::from(RowRange::prefix("testColumn")), None, &mut |row| {
            seen.push(row.key.to_string());
            true
        })
        .unwrap();
        assert_eq!(seen, vec!["testColumn0", "testColumn1", "testColumn2"]);

        let mut count = 0;
        data.read_rows("t", &RowSet::All, None, &mut |_| {
            count += 1;
            count < 2
        })
        .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_filtered_empty_rows_are_skipped() {
        let (_admin, data) = setup();
        write(&data, &[("r", "v")]);
        let mut count = 0;
        data.read_rows("t", &RowSet::All, Some(&RowFilter::column("other")), &mut |_| {
            count += 1;
            true
        })
        .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_bulk_reports_per_row_errors() {
        let (_admin, data) = setup();
        let mut bad = Mutation::new();
        bad.set("cf9", "q", Timestamp::from_micros(1000), b"v".to_vec());
        let keys = vec![RowKey::from("ok"), RowKey::from("bad")];
        let errors = data.apply_bulk("t", &keys, &[greeting("v"), bad]).unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].index, 1);
        assert_eq!(errors[0].key, RowKey::from("bad"));
        assert!(errors[0].error.is_not_found());
        assert!(data.read_row("t", &RowKey::from("ok"), None).unwrap().is_some());
    }

    #[test]
    fn test_bulk_on_missing_table_fails_whole_request() {
        let (_admin, data) = setup();
        let err = data
            .apply_bulk("missing", &[RowKey::from("k")], &[greeting("v")])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_drop_row_range() {
        let (admin, data) = setup();
        write(&data, &[("testColumn0", "0"), ("testColumn1", "1")]);
        admin.drop_row_range("t", b"testColumn0").unwrap();
        assert!(data.read_row("t", &RowKey::from("testColumn0"), None).unwrap().is_none());
        assert!(data.read_row("t", &RowKey::from("testColumn1"), None).unwrap().is_some());
        assert!(matches!(admin.drop_row_range("t", b""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_close_is_per_client() {
        let (admin, data) = setup();
        data.close().unwrap();
        assert_eq!(data.sample_row_keys("t"), Err(Error::Closed));
        assert_eq!(data.close(), Err(Error::Closed));
        assert!(admin.tables().is_ok());
        admin.close().unwrap();
        assert_eq!(admin.tables(), Err(Error::Closed));
    }

    #[test]
    fn test_visitor_may_reenter_client() {
        let (_admin, data) = setup();
        write(&data, &[("a", "1"), ("b", "2")]);
        let mut inner = 0;
        data.read_rows("t", &RowSet::All, None, &mut |row| {
            if data.read_row("t", &row.key, None).unwrap().is_some() {
                inner += 1;
            }
            true
        })
        .unwrap();
        assert_eq!(inner, 2);
    }
}
