//! Unified error types for the walkthrough.
//!
//! This module provides a clean error type that wraps client and
//! configuration errors and presents a consistent interface to the binary.

use hellotable_core::Error as ClientError;
use hellotable_options::OptionsError;
use thiserror::Error;

/// All walkthrough errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration
    #[error(transparent)]
    Config(#[from] OptionsError),

    /// A client call failed; `context` names the step
    #[error("{context}: {source}")]
    Client {
        /// What the walkthrough was doing
        context: String,
        /// Error reported by the client
        #[source]
        source: ClientError,
    },

    /// Bulk write left some rows unwritten
    #[error("could not write {failed} of {total} rows")]
    PartialWrite {
        /// Rows that failed
        failed: usize,
        /// Rows in the request
        total: usize,
    },

    /// A row expected to hold a greeting has no cell in the family
    #[error("row {key} has no cell in column family {family}")]
    MissingCell {
        /// Row key
        key: String,
        /// Column family looked up
        family: String,
    },

    /// Report serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for walkthrough operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The client error underneath, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Client { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self.client_error(), Some(e) if e.is_not_found())
    }

    /// Check if the underlying failure may go away on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self.client_error(), Some(e) if e.is_retryable())
    }
}

/// Attach a step description to a client result.
pub(crate) trait Context<T> {
    fn context(self, context: impl FnOnce() -> String) -> Result<T>;
}

impl<T> Context<T> for std::result::Result<T, ClientError> {
    fn context(self, context: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|source| Error::Client {
            context: context(),
            source,
        })
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
