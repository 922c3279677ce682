//! Core types for the hellotable walkthrough
//!
//! This crate defines the vocabulary shared by every backend:
//! - [`RowKey`], [`Cell`], [`Row`]: the wide-column data model
//! - [`Mutation`]: ordered edits applied to a single row
//! - [`RowRange`] / [`RowSet`]: which rows a read touches
//! - [`RowFilter`]: which cells of those rows come back
//! - [`AdminClient`] / [`DataClient`]: the two client surfaces of the service

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod error;
pub mod filter;
pub mod mutation;
pub mod row_set;
pub mod traits;
pub mod types;

pub use constants::{slice_contains, COLUMN_FAMILY_NAME, COLUMN_NAME, GREETINGS, TABLE_NAME};
pub use error::{Error, Result};
pub use filter::RowFilter;
pub use mutation::{Mutation, MutationOp};
pub use row_set::{prefix_successor, RowRange, RowSet};
pub use traits::{check_bulk_shape, AdminClient, DataClient, RowError};
pub use types::{Cell, Row, RowKey, SampleKey, TableInfo, Timestamp};
