//! Convenient imports for the walkthrough.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use hellotable::prelude::*;
//!
//! let walkthrough = Walkthrough::in_memory(Schema::default());
//! walkthrough.run()?;
//! ```

// Main entry point
pub use crate::walkthrough::{Report, Schema, Walkthrough};

// Error handling
pub use crate::error::{Error, Result};

// Configuration
pub use crate::types::{Backend, ConnectOptions};

// Client surfaces and data model
pub use crate::types::{AdminClient, DataClient, Mutation, Row, RowFilter, RowKey, RowRange, RowSet, Timestamp};
