//! Backend selection.
//!
//! Turns [`ConnectOptions`] into a connected [`Walkthrough`].

use crate::error::{Context, Result};
use crate::walkthrough::{Schema, Walkthrough};
use hellotable_memory::MemoryBackend;
use hellotable_options::{Backend, ConnectOptions};
use tracing::info;

impl Walkthrough {
    /// Validate `opts` and create the admin and data clients it describes.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use hellotable::prelude::*;
    ///
    /// let opts = ConnectOptions::new("my-project", "my-instance").backend(Backend::Memory);
    /// let walkthrough = Walkthrough::connect(&opts, Schema::default())?;
    /// let report = walkthrough.run()?;
    /// ```
    pub fn connect(opts: &ConnectOptions, schema: Schema) -> Result<Self> {
        opts.validate()?;
        match opts.backend {
            Backend::Rest => {
                info!(
                    instance = %opts.instance_path(),
                    admin = %opts.admin_endpoint,
                    data = %opts.data_endpoint,
                    "connecting"
                );
                let (admin, data) = hellotable_rest::connect(opts)
                    .context(|| "Could not create clients".to_string())?;
                Ok(Self::new(Box::new(admin), Box::new(data), schema))
            }
            Backend::Memory => {
                info!(instance = %opts.instance_path(), "using in-process backend");
                let backend = MemoryBackend::new();
                Ok(Self::new(
                    Box::new(backend.admin_client()),
                    Box::new(backend.data_client()),
                    schema,
                ))
            }
        }
    }

    /// Connected to a fresh in-process instance.
    pub fn in_memory(schema: Schema) -> Self {
        let backend = MemoryBackend::new();
        Self::new(
            Box::new(backend.admin_client()),
            Box::new(backend.data_client()),
            schema,
        )
    }
}
