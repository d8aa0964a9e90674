//! Search Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Engine implementations raise their
//! own failures into one of these kinds; consumers of the [`SearchEngine`]
//! trait treat every kind as a failed search.
//!
//! [`SearchEngine`]: crate::SearchEngine

use derive_more::{Display, Error};

/// A search error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The engine rejected or failed to execute the query.
    #[display("search backend error: {_0}")]
    Backend(#[error(not(source))] String),
    /// The engine (or its connection pool) is not reachable right now.
    #[display("search engine unavailable")]
    Unavailable,
    /// A query value could not be understood.
    #[display("invalid query value: {_0}")]
    InvalidQuery(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}
