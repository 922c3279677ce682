//! In-process backend for the hellotable client traits
//!
//! [`MemoryBackend`] owns one [`MemoryStore`] and hands out admin and data
//! clients that share it. Behaviour mirrors the managed service closely
//! enough for the walkthrough and its tests: missing tables are `NotFound`,
//! writes to undeclared families fail per row, regex filters full-match.
//!
//! ```
//! use hellotable_core::{AdminClient, DataClient};
//! use hellotable_memory::MemoryBackend;
//!
//! let backend = MemoryBackend::new();
//! let admin = backend.admin_client();
//! admin.create_table("t").unwrap();
//! assert_eq!(admin.tables().unwrap(), vec!["t".to_string()]);
//! ```

#![warn(clippy::all)]

mod client;
mod filter;
pub mod store;

pub use client::{MemoryAdminClient, MemoryBackend, MemoryDataClient, DEFAULT_SAMPLE_EVERY};
pub use store::MemoryStore;
