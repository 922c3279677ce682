//! # hellotable
//!
//! A walkthrough of a managed wide-column storage service's client.
//!
//! The walkthrough creates a table, makes sure a column family exists,
//! writes a few greeting rows, reads them back one by one and in bulk,
//! drops a row range, samples row keys and finally deletes the table. Every
//! step is a direct call into the admin or data client; the interesting
//! machinery lives in the service.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hellotable::prelude::*;
//!
//! let opts = ConnectOptions::from_env("my-project", "my-instance");
//! let walkthrough = Walkthrough::connect(&opts, Schema::default())?;
//! let report = walkthrough.run()?;
//! println!("{} samples", report.samples.len());
//! ```
//!
//! ## Backends
//!
//! - [`Backend::Rest`] - the managed service over its JSON API
//! - [`Backend::Memory`] - an in-process instance, for tests and dry runs

#![warn(missing_docs)]

mod connect;
mod error;
mod types;
mod walkthrough;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use walkthrough::{greeting_mutations, DisplayedRow, Report, Schema, Walkthrough};

// Re-export types
pub use types::*;
