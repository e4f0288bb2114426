//! Fetch error types.

use thiserror::Error;

/// Errors a catalog source can return.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Nothing stored under the query.
    #[error("No catalog data for {0}")]
    NotFound(String),

    /// Reading the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Response decoded but has the wrong shape for the query.
    #[error("Unexpected response shape for {query}: {reason}")]
    Shape { query: String, reason: String },
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Deserialization(e.to_string())
    }
}
