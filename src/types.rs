//! Public types for the walkthrough API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Data model
pub use hellotable_core::{Cell, Mutation, MutationOp, Row, RowKey, SampleKey, TableInfo, Timestamp};

// Row selection
pub use hellotable_core::{RowFilter, RowRange, RowSet};

// Client surfaces
pub use hellotable_core::{AdminClient, DataClient, RowError};

// Client-level error, distinct from the walkthrough's [`Error`](crate::Error)
pub use hellotable_core::Error as ClientError;

// Defaults
pub use hellotable_core::{COLUMN_FAMILY_NAME, COLUMN_NAME, GREETINGS, TABLE_NAME};

// Configuration
pub use hellotable_options::{Backend, ConnectOptions, OptionsError};

// Backends
pub use hellotable_memory::{MemoryAdminClient, MemoryBackend, MemoryDataClient};
pub use hellotable_rest::{RestAdminClient, RestDataClient};
