//! Shared fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hellotable::{
    AdminClient, ClientError, DataClient, MemoryAdminClient, MemoryBackend, MemoryDataClient,
    Mutation, Row, RowError, RowFilter, RowKey, RowSet, SampleKey, Schema, TableInfo, Walkthrough,
};

/// A walkthrough plus a handle on the instance it talks to.
pub fn setup() -> (MemoryBackend, Walkthrough) {
    let backend = MemoryBackend::new();
    let walkthrough = Walkthrough::new(
        Box::new(backend.admin_client()),
        Box::new(backend.data_client()),
        Schema::default(),
    );
    (backend, walkthrough)
}

/// Tables currently in the instance, seen through a separate client.
pub fn tables(backend: &MemoryBackend) -> Vec<String> {
    backend.admin_client().tables().unwrap()
}

/// Create the default table and family ahead of the walkthrough.
pub fn precreate(backend: &MemoryBackend) {
    let admin = backend.admin_client();
    admin.create_table(hellotable::TABLE_NAME).unwrap();
    admin
        .create_column_family(hellotable::TABLE_NAME, hellotable::COLUMN_FAMILY_NAME)
        .unwrap();
}

fn injected(op: &str) -> ClientError {
    ClientError::Unavailable(format!("injected failure in {}", op))
}

/// Admin client failing one named operation.
pub struct FaultyAdmin {
    pub inner: MemoryAdminClient,
    pub fail: Option<&'static str>,
    pub closes: Arc<AtomicUsize>,
}

impl FaultyAdmin {
    fn check(&self, op: &'static str) -> Result<(), ClientError> {
        if self.fail == Some(op) {
            return Err(injected(op));
        }
        Ok(())
    }
}

impl AdminClient for FaultyAdmin {
    fn tables(&self) -> Result<Vec<String>, ClientError> {
        self.check("tables")?;
        self.inner.tables()
    }

    fn create_table(&self, table: &str) -> Result<(), ClientError> {
        self.check("create_table")?;
        self.inner.create_table(table)
    }

    fn table_info(&self, table: &str) -> Result<TableInfo, ClientError> {
        self.check("table_info")?;
        self.inner.table_info(table)
    }

    fn create_column_family(&self, table: &str, family: &str) -> Result<(), ClientError> {
        self.check("create_column_family")?;
        self.inner.create_column_family(table, family)
    }

    fn drop_row_range(&self, table: &str, prefix: &[u8]) -> Result<(), ClientError> {
        self.check("drop_row_range")?;
        self.inner.drop_row_range(table, prefix)
    }

    fn delete_table(&self, table: &str) -> Result<(), ClientError> {
        self.check("delete_table")?;
        self.inner.delete_table(table)
    }

    fn close(&self) -> Result<(), ClientError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.check("close")?;
        self.inner.close()
    }
}

/// Data client failing one named operation, or rejecting one bulk entry.
pub struct FaultyData {
    pub inner: MemoryDataClient,
    pub fail: Option<&'static str>,
    pub reject_row: Option<usize>,
    pub closes: Arc<AtomicUsize>,
}

impl FaultyData {
    fn check(&self, op: &'static str) -> Result<(), ClientError> {
        if self.fail == Some(op) {
            return Err(injected(op));
        }
        Ok(())
    }
}

impl DataClient for FaultyData {
    fn read_rows(
        &self,
        table: &str,
        rows: &RowSet,
        filter: Option<&RowFilter>,
        visit: &mut dyn FnMut(Row) -> bool,
    ) -> Result<(), ClientError> {
        self.check("read_rows")?;
        self.inner.read_rows(table, rows, filter, visit)
    }

    fn apply_bulk(
        &self,
        table: &str,
        keys: &[RowKey],
        mutations: &[Mutation],
    ) -> Result<Vec<RowError>, ClientError> {
        self.check("apply_bulk")?;
        let mut errors = self.inner.apply_bulk(table, keys, mutations)?;
        if let Some(index) = self.reject_row {
            errors.push(RowError {
                index,
                key: keys[index].clone(),
                error: ClientError::InvalidArgument("rejected".into()),
            });
        }
        Ok(errors)
    }

    fn sample_row_keys(&self, table: &str) -> Result<Vec<SampleKey>, ClientError> {
        self.check("sample_row_keys")?;
        self.inner.sample_row_keys(table)
    }

    fn close(&self) -> Result<(), ClientError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.check("close")?;
        self.inner.close()
    }
}

/// Counters of close calls on the admin and data clients.
pub struct Closes {
    pub admin: Arc<AtomicUsize>,
    pub data: Arc<AtomicUsize>,
}

impl Closes {
    pub fn admin(&self) -> usize {
        self.admin.load(Ordering::SeqCst)
    }

    pub fn data(&self) -> usize {
        self.data.load(Ordering::SeqCst)
    }
}

/// Walkthrough whose admin fails `admin_fail` and data fails `data_fail`.
pub fn faulty(
    admin_fail: Option<&'static str>,
    data_fail: Option<&'static str>,
    reject_row: Option<usize>,
) -> (MemoryBackend, Walkthrough, Closes) {
    let backend = MemoryBackend::new();
    let closes = Closes {
        admin: Arc::new(AtomicUsize::new(0)),
        data: Arc::new(AtomicUsize::new(0)),
    };
    let admin = FaultyAdmin {
        inner: backend.admin_client(),
        fail: admin_fail,
        closes: Arc::clone(&closes.admin),
    };
    let data = FaultyData {
        inner: backend.data_client(),
        fail: data_fail,
        reject_row,
        closes: Arc::clone(&closes.data),
    };
    let walkthrough = Walkthrough::new(Box::new(admin), Box::new(data), Schema::default());
    (backend, walkthrough, closes)
}
