//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while configuring the matcher or ingesting a catalog.
///
/// Querying an index never fails: an empty result means "no match".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// Rejected matcher options (threshold range, field list, weights)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Catalog JSON could not be turned into product records
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl SearchError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidCatalog(err.to_string())
    }
}
