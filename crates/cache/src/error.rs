//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Every kind here describes a failed warm job. They are logged by the
//! rebuild and never returned to request-serving code: a job that failed
//! simply leaves its keys out of the snapshot, and readers fall back to live
//! queries.

use derive_more::{Display, Error};

/// A cache warm error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache warm operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not sample bookshelf {_0}")]
    Bookshelf(#[error(not(source))] u64),
    /// Empty code means the top level of the tree.
    #[display("could not warm classification '{_0}'")]
    Classification(#[error(not(source))] String),
    #[display("could not rank subjects")]
    Subjects,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The next rebuild is the retry.
        false
    }
}
