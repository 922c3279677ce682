//! The walkthrough script.
//!
//! [`Walkthrough`] owns one admin client and one data client and exposes each
//! step of the demo as its own operation. [`Walkthrough::run`] performs them
//! in the fixed order:
//!
//! 1. ensure the table exists
//! 2. ensure the column family exists
//! 3. write one row per greeting, read the first back, read them all
//! 4. drop the first row's key range, read them all again
//! 5. sample row keys
//! 6. delete the table
//!
//! Connections are closed at the end whether or not a step failed.

use crate::error::{Context, Error, Result};
use hellotable_core::{
    slice_contains, AdminClient, DataClient, Mutation, Row, RowFilter, RowKey, RowRange, RowSet,
    SampleKey, TableInfo, Timestamp, COLUMN_FAMILY_NAME, COLUMN_NAME, GREETINGS, TABLE_NAME,
};
use serde::Serialize;
use tracing::{info, info_span, warn};

/// Names the walkthrough operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Table to create and delete
    pub table: String,
    /// Column family holding the greetings
    pub family: String,
    /// Column qualifier, also the row key prefix
    pub column: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            table: TABLE_NAME.to_string(),
            family: COLUMN_FAMILY_NAME.to_string(),
            column: COLUMN_NAME.to_string(),
        }
    }
}

impl Schema {
    /// Key of the `index`-th greeting row: `<column><index>`
    pub fn row_key(&self, index: usize) -> RowKey {
        RowKey::from(format!("{}{}", self.column, index))
    }

    /// Filter keeping only the greeting column, matched literally
    pub fn column_filter(&self) -> RowFilter {
        RowFilter::exact_column(&self.column)
    }
}

/// A greeting as displayed: `<key> = <value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedRow {
    /// Row key
    pub key: String,
    /// First value of the family, as text
    pub value: String,
}

/// Everything the walkthrough observed, in step order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Whether step 1 had to create the table
    pub created_table: bool,
    /// Schema read in step 2, before any family was added
    pub table_info: Option<TableInfo>,
    /// Whether step 2 had to create the family
    pub created_family: bool,
    /// Keys written in step 3
    pub written: Vec<String>,
    /// Single-row read of step 3
    pub first_row: Option<DisplayedRow>,
    /// Full read of step 3
    pub all_rows: Vec<DisplayedRow>,
    /// Failure of the row range drop, which does not stop the script
    pub drop_error: Option<String>,
    /// Full read after the drop
    pub after_delete: Vec<DisplayedRow>,
    /// Split points of step 5
    pub samples: Vec<SampleKey>,
}

/// Build one greeting write per entry of [`GREETINGS`].
pub fn greeting_mutations(schema: &Schema, timestamp: Timestamp) -> (Vec<RowKey>, Vec<Mutation>) {
    GREETINGS
        .iter()
        .enumerate()
        .map(|(i, greeting)| {
            let mut mutation = Mutation::new();
            mutation.set(
                schema.family.clone(),
                schema.column.clone(),
                timestamp,
                greeting.as_bytes().to_vec(),
            );
            (schema.row_key(i), mutation)
        })
        .unzip()
}

/// The demo, one method per step.
pub struct Walkthrough {
    admin: Box<dyn AdminClient>,
    data: Box<dyn DataClient>,
    schema: Schema,
}

impl Walkthrough {
    /// Wrap already-connected clients.
    pub fn new(admin: Box<dyn AdminClient>, data: Box<dyn DataClient>, schema: Schema) -> Self {
        Self {
            admin,
            data,
            schema,
        }
    }

    /// Names in use.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Check whether the table is listed by the instance.
    pub fn table_exists(&self) -> Result<bool> {
        let tables = self
            .admin
            .tables()
            .context(|| "Could not fetch table list".to_string())?;
        Ok(slice_contains(&tables, &self.schema.table))
    }

    /// Create the table unless it is already there. Returns whether it was created.
    pub fn create_if_not_exists(&self) -> Result<bool> {
        if self.table_exists()? {
            return Ok(false);
        }
        let table = &self.schema.table;
        info!("Creating table {}", table);
        self.admin
            .create_table(table)
            .context(|| format!("Could not create table {}", table))?;
        Ok(true)
    }

    /// Read the table schema and add the family when missing.
    ///
    /// Returns the schema as read (before any change) and whether the family
    /// was created.
    pub fn create_column_family(&self) -> Result<(TableInfo, bool)> {
        let table = &self.schema.table;
        let family = &self.schema.family;
        let info = self
            .admin
            .table_info(table)
            .context(|| format!("Could not read info for table {}", table))?;
        info!(?info, "Table info");

        if slice_contains(&info.families, family) {
            return Ok((info, false));
        }
        self.admin
            .create_column_family(table, family)
            .context(|| format!("Could not create column family {}", family))?;
        Ok((info, true))
    }

    fn displayed(&self, row: &Row) -> Option<DisplayedRow> {
        row.first_value(&self.schema.family).map(|value| DisplayedRow {
            key: row.key.to_string(),
            value: String::from_utf8_lossy(value).into_owned(),
        })
    }

    /// Read one row filtered to the greeting column and log it.
    pub fn display_row(&self, key: &RowKey) -> Result<DisplayedRow> {
        let filter = self.schema.column_filter();
        let row = self
            .data
            .read_row(&self.schema.table, key, Some(&filter))
            .context(|| format!("Could not read row with key {}", key))?;
        let shown = row
            .as_ref()
            .and_then(|row| self.displayed(row))
            .ok_or_else(|| Error::MissingCell {
                key: key.to_string(),
                family: self.schema.family.clone(),
            })?;
        info!("\t{} = {}", shown.key, shown.value);
        Ok(shown)
    }

    /// Read every greeting row (keys prefixed by the column name) and log each.
    pub fn display_all(&self) -> Result<Vec<DisplayedRow>> {
        let filter = self.schema.column_filter();
        let range = RowRange::prefix(&self.schema.column);
        let mut shown = Vec::new();
        self.data
            .read_rows(&self.schema.table, &RowSet::from(range), Some(&filter), &mut |row| {
                match self.displayed(&row) {
                    Some(item) => {
                        info!("\t{} = {}", item.key, item.value);
                        shown.push(item);
                    }
                    None => warn!(key = %row.key, "row has no cell in the greeting family"),
                }
                true
            })
            .context(|| format!("Could not read rows of table {}", self.schema.table))?;
        Ok(shown)
    }

    /// Write the greetings, then read the first one back and read all of them.
    pub fn insert_and_display(&self) -> Result<(Vec<RowKey>, DisplayedRow, Vec<DisplayedRow>)> {
        let (keys, mutations) = greeting_mutations(&self.schema, Timestamp::now());

        info!("Writing greeting rows to table");
        let row_errors = self
            .data
            .apply_bulk(&self.schema.table, &keys, &mutations)
            .context(|| "Could not apply bulk row mutation".to_string())?;
        if !row_errors.is_empty() {
            for row_error in &row_errors {
                warn!("Error writing row: {}", row_error);
            }
            warn!("Could not write some rows");
            return Err(Error::PartialWrite {
                failed: row_errors.len(),
                total: keys.len(),
            });
        }

        info!("Getting a single greeting by row key:");
        let first = self.display_row(&keys[0])?;

        info!("Reading all greeting rows:");
        let all = self.display_all()?;

        Ok((keys, first, all))
    }

    /// Drop every row keyed `<column>0...`, then read all greetings again.
    ///
    /// A failed drop is logged and reported but does not fail the step.
    pub fn delete_row(&self) -> Result<(Option<String>, Vec<DisplayedRow>)> {
        let prefix = format!("{}0", self.schema.column);
        let drop_error = match self.admin.drop_row_range(&self.schema.table, prefix.as_bytes()) {
            Ok(()) => None,
            Err(e) => {
                warn!("Err deleting row range: {}", e);
                Some(e.to_string())
            }
        };

        info!("After deletion of single row:");
        let remaining = self.display_all()?;
        Ok((drop_error, remaining))
    }

    /// Split points of the table.
    pub fn sample_row_keys(&self) -> Result<Vec<SampleKey>> {
        self.data
            .sample_row_keys(&self.schema.table)
            .context(|| "Err in SampleRowKeys".to_string())
    }

    /// Delete the table and its data.
    pub fn delete_table(&self) -> Result<()> {
        let table = &self.schema.table;
        self.admin
            .delete_table(table)
            .context(|| format!("Could not delete table {}", table))
    }

    /// Close the data client, then the admin client.
    pub fn close_connections(&self) -> Result<()> {
        self.data
            .close()
            .context(|| "Could not close data operations client".to_string())?;
        self.admin
            .close()
            .context(|| "Could not close admin client".to_string())
    }

    fn run_steps(&self) -> Result<Report> {
        let mut report = Report {
            created_table: self.create_if_not_exists()?,
            ..Report::default()
        };

        let (info, created_family) = self.create_column_family()?;
        report.table_info = Some(info);
        report.created_family = created_family;

        let (keys, first, all) = self.insert_and_display()?;
        report.written = keys.iter().map(|k| k.to_string()).collect();
        report.first_row = Some(first);
        report.all_rows = all;

        info!("Deleting a row");
        let (drop_error, remaining) = self.delete_row()?;
        report.drop_error = drop_error;
        report.after_delete = remaining;

        report.samples = self.sample_row_keys()?;
        let rendered: Vec<String> = report.samples.iter().map(|s| s.to_string()).collect();
        info!("SampleRowKeys res: {:?}", rendered);

        info!("Deleting the table");
        self.delete_table()?;
        Ok(report)
    }

    /// Run every step in order, then close both connections.
    ///
    /// The first failing step's error is returned; a close failure is only
    /// returned when every step succeeded.
    pub fn run(&self) -> Result<Report> {
        let span = info_span!("walkthrough", table = %self.schema.table);
        let _enter = span.enter();

        let outcome = self.run_steps();
        info!("closing connections!");
        let closed = self.close_connections();
        if let Err(e) = &closed {
            warn!("{}", e);
        }
        let report = outcome?;
        closed?;
        Ok(report)
    }
}
