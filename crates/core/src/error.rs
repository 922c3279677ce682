//! Error type shared by every client implementation
//!
//! The variants follow the status vocabulary of the managed service so that
//! a remote failure and the same failure from the in-process backend look
//! identical to the caller.

use thiserror::Error;

/// Errors returned by [`AdminClient`](crate::AdminClient) and
/// [`DataClient`](crate::DataClient) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Table, family, or row does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Table or family already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Request rejected as malformed or inconsistent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Caller is not authenticated or not authorized
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Service temporarily unable to serve the request
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Request never reached the service or the connection broke
    #[error("transport error: {0}")]
    Transport(String),

    /// Response could not be understood
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Client used after `close()`
    #[error("client is closed")]
    Closed,

    /// Anything else reported by the service
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Map a canonical status name (e.g. `NOT_FOUND`) to an error.
    pub fn from_status(status: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            "NOT_FOUND" => Error::NotFound(message),
            "ALREADY_EXISTS" => Error::AlreadyExists(message),
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "OUT_OF_RANGE" => {
                Error::InvalidArgument(message)
            }
            "PERMISSION_DENIED" | "UNAUTHENTICATED" => Error::PermissionDenied(message),
            "UNAVAILABLE" | "DEADLINE_EXCEEDED" | "RESOURCE_EXHAUSTED" | "ABORTED" => {
                Error::Unavailable(message)
            }
            _ => Error::Internal(message),
        }
    }

    /// Map a numeric status code (as carried in per-entry bulk results).
    pub fn from_code(code: i32, message: impl Into<String>) -> Self {
        let status = match code {
            3 | 9 | 11 => "INVALID_ARGUMENT",
            4 | 8 | 10 | 14 => "UNAVAILABLE",
            5 => "NOT_FOUND",
            6 => "ALREADY_EXISTS",
            7 | 16 => "PERMISSION_DENIED",
            _ => "INTERNAL",
        };
        Self::from_status(status, message)
    }

    /// Check if the failure may go away on its own.
    ///
    /// No caller retries; this only informs log output.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unavailable(_) | Error::Transport(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
