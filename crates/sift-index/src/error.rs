//! Error types for indexing and query parsing.

use sift_query::QueryError;
use std::fmt;

/// Errors that can occur while indexing documents or building query trees
/// from the DSL.
#[derive(Debug)]
pub enum IndexError {
    /// I/O error (postings files, directory creation).
    Io(std::io::Error),
    /// Error propagated out of query evaluation.
    Query(QueryError),
    /// The DSL input was not valid JSON.
    Dsl(serde_json::Error),
    /// The DSL input was well-formed but structurally invalid (e.g. a term
    /// with children, an OR with a `not` branch).
    InvalidQuery(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Io(e) => write!(f, "I/O error: {}", e),
            IndexError::Query(e) => write!(f, "Query error: {}", e),
            IndexError::Dsl(e) => write!(f, "DSL parse error: {}", e),
            IndexError::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
        }
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndexError::Io(e) => Some(e),
            IndexError::Query(e) => Some(e),
            IndexError::Dsl(e) => Some(e),
            IndexError::InvalidQuery(_) => None,
        }
    }
}

impl From<std::io::Error> for IndexError {
    fn from(e: std::io::Error) -> Self {
        IndexError::Io(e)
    }
}

impl From<QueryError> for IndexError {
    fn from(e: QueryError) -> Self {
        IndexError::Query(e)
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(e: serde_json::Error) -> Self {
        IndexError::Dsl(e)
    }
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
