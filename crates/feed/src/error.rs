//! Feed Error Types
//!
//! Every route returns either a feed or one of these kinds. Failures from the
//! search engine keep their error tree underneath, so logging the error at
//! the transport layer shows the original cause.

use derive_more::{Display, Error};

/// A feed error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested catalog entry does not exist.
    #[display("{_0} not found")]
    NotFound(#[error(not(source))] String),
    /// A live query against the search engine failed.
    #[display("{_0}")]
    SearchFailure(#[error(not(source))] &'static str),
}

impl ErrorKind {
    pub const BROWSE_FAILED: &'static str = "Browse failed";
    pub const SEARCH_FAILED: &'static str = "Search failed";

    /// HTTP status the transport layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::SearchFailure(_) => 500,
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SearchFailure(_))
    }
}
