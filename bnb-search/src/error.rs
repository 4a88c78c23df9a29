//! Error types for the branch-and-bound search.

use thiserror::Error;

/// Errors that abort a search.
///
/// Limits (time, nodes) and proven infeasibility are not errors; they are
/// reported through [`SearchStatus`](crate::SearchStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Problem validation failed
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Relaxation oracle failed (numerical trouble, unbounded relaxation, solver error)
    #[error("Oracle failed: {0}")]
    Oracle(String),

    /// Internal search error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for search operations.
pub type BnbResult<T> = Result<T, SearchError>;
