//! Error types for query evaluation.

use std::fmt;

/// Errors that can occur while driving a cursor tree.
///
/// Only the file-backed leaf performs fallible work at evaluation time;
/// in-memory cursors never fail. Compositors forward the first error they
/// see, which aborts the evaluation.
#[derive(Debug)]
pub enum QueryError {
    /// I/O error from a file-backed posting list (open/stat/read/write).
    Io(std::io::Error),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for QueryError {
    fn from(e: std::io::Error) -> Self {
        QueryError::Io(e)
    }
}

/// Result type for cursor operations.
pub type QueryResult<T> = Result<T, QueryError>;
