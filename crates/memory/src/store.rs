//! Table storage for the in-process backend
//!
//! # Design
//!
//! - DashMap keyed by table name: admin operations on different tables never contend
//! - Each table behind its own `RwLock`: scans take a read lock, bulk writes a write lock
//! - BTreeMap of rows: reads come back in key order without sorting
//!
//! Per-row mutations are all-or-nothing: every family a mutation touches is
//! checked before any edit is applied.

use dashmap::DashMap;
use hellotable_core::{Cell, Error, Mutation, MutationOp, Result, Row, RowKey, SampleKey, TableInfo};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

const MAX_TABLE_ID_LEN: usize = 50;

/// Columns of one row: (family, qualifier) -> versions, newest first
type Columns = BTreeMap<(String, String), Vec<Cell>>;

/// One table: declared families plus rows
#[derive(Debug, Default)]
pub struct Table {
    families: BTreeSet<String>,
    rows: BTreeMap<RowKey, Columns>,
}

impl Table {
    /// Declared family names, sorted
    pub fn families(&self) -> Vec<String> {
        self.families.iter().cloned().collect()
    }

    /// Number of non-empty rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows selected by `select`, in key order
    pub fn rows_matching(&self, select: impl Fn(&RowKey) -> bool) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|(key, _)| select(key))
            .map(|(key, columns)| {
                Row::new(key.clone(), columns.values().flatten().cloned().collect())
            })
            .collect()
    }

    /// Apply one row's mutation atomically
    pub fn apply(&mut self, key: &RowKey, mutation: &Mutation) -> Result<()> {
        if mutation.is_empty() {
            return Err(Error::InvalidArgument(format!("no mutations for row {}", key)));
        }
        for op in mutation.ops() {
            let family = match op {
                MutationOp::SetCell { family, .. }
                | MutationOp::DeleteFromColumn { family, .. }
                | MutationOp::DeleteFromFamily { family } => family,
                MutationOp::DeleteFromRow => continue,
            };
            if !self.families.contains(family) {
                return Err(Error::NotFound(format!("column family {}", family)));
            }
        }

        let columns = self.rows.entry(key.clone()).or_default();
        for op in mutation.ops() {
            match op {
                MutationOp::SetCell {
                    family,
                    qualifier,
                    timestamp,
                    value,
                } => {
                    let versions = columns
                        .entry((family.clone(), qualifier.clone()))
                        .or_default();
                    // Same timestamp overwrites the existing version.
                    versions.retain(|c| c.timestamp != *timestamp);
                    versions.push(Cell {
                        family: family.clone(),
                        qualifier: qualifier.clone(),
                        timestamp: *timestamp,
                        value: value.clone(),
                    });
                    versions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                }
                MutationOp::DeleteFromColumn { family, qualifier } => {
                    columns.remove(&(family.clone(), qualifier.clone()));
                }
                MutationOp::DeleteFromFamily { family } => {
                    columns.retain(|(f, _), _| f != family);
                }
                MutationOp::DeleteFromRow => columns.clear(),
            }
        }
        if columns.is_empty() {
            self.rows.remove(key);
        }
        Ok(())
    }

    /// Remove every row starting with `prefix`, returning how many went
    pub fn drop_prefix(&mut self, prefix: &[u8]) -> usize {
        let before = self.rows.len();
        self.rows.retain(|key, _| !key.has_prefix(prefix));
        before - self.rows.len()
    }

    /// Split points: the key of every `every`-th row, then the end-of-table marker
    pub fn samples(&self, every: usize) -> Vec<SampleKey> {
        let every = every.max(1);
        let mut samples = Vec::new();
        let mut offset = 0u64;
        for (i, (key, columns)) in self.rows.iter().enumerate() {
            if i > 0 && i % every == 0 {
                samples.push(SampleKey {
                    key: key.clone(),
                    offset_bytes: offset,
                });
            }
            offset += row_size(key, columns);
        }
        samples.push(SampleKey {
            key: RowKey::default(),
            offset_bytes: offset,
        });
        samples
    }
}

fn row_size(key: &RowKey, columns: &Columns) -> u64 {
    let cells: usize = columns
        .values()
        .flatten()
        .map(|c| c.family.len() + c.qualifier.len() + c.value.len() + 8)
        .sum();
    (key.as_bytes().len() + cells) as u64
}

/// Check a table id against the service's naming rule `[_a-zA-Z0-9][-_.a-zA-Z0-9]*`
pub fn validate_table_id(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid_first = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphanumeric());
    let valid_rest = chars.all(|c| c == '-' || c == '_' || c == '.' || c.is_ascii_alphanumeric());
    if !valid_first || !valid_rest || table.len() > MAX_TABLE_ID_LEN {
        return Err(Error::InvalidArgument(format!("invalid table id {:?}", table)));
    }
    Ok(())
}

/// All tables of one in-process instance
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: DashMap<String, Arc<RwLock<Table>>>,
}

impl MemoryStore {
    /// Create an empty instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Table names, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Create an empty table
    pub fn create_table(&self, table: &str) -> Result<()> {
        validate_table_id(table)?;
        match self.tables.entry(table.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(Error::AlreadyExists(format!("table {}", table)))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(RwLock::new(Table::default())));
                Ok(())
            }
        }
    }

    /// Remove a table
    pub fn delete_table(&self, table: &str) -> Result<()> {
        self.tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("table {}", table)))
    }

    /// Handle to a table; the map guard is released before the caller locks it
    pub fn table(&self, table: &str) -> Result<Arc<RwLock<Table>>> {
        self.tables
            .get(table)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NotFound(format!("table {}", table)))
    }

    /// Schema summary
    pub fn table_info(&self, table: &str) -> Result<TableInfo> {
        let handle = self.table(table)?;
        let families = handle.read().families();
        Ok(TableInfo {
            name: table.to_string(),
            families,
        })
    }

    /// Declare a column family
    pub fn create_family(&self, table: &str, family: &str) -> Result<()> {
        if family.is_empty() {
            return Err(Error::InvalidArgument("empty column family name".into()));
        }
        let handle = self.table(table)?;
        let mut guard = handle.write();
        if !guard.families.insert(family.to_string()) {
            return Err(Error::AlreadyExists(format!("column family {}", family)));
        }
        Ok(())
    }
}
