//! Search engine trait and implementations.
//!
//! This module defines the `SearchEngine` trait, the only way the rest of
//! the workspace talks to the full-text/faceted search service. Ranking,
//! tokenisation and storage all live behind it.

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use self::mock::{Call, Failure, MockBook, MockEngine};
use crate::constants::Crosswalk;
use crate::error::Result;
use crate::models::{ClassificationNode, FeedResult, Subject, TopSubject};
use crate::query::Query;
use async_trait::async_trait;

/// Unified interface for search engines.
///
/// All operations are asynchronous; engines are expected to be shared between
/// concurrent requests (see [`EngineHandle`](crate::EngineHandle)) and must
/// therefore work through `&self`.
///
/// # Examples
///
/// ```
/// use folio_search::{SearchEngine, Query, error::Result};
/// use folio_search::constants::{Crosswalk, OrderBy};
///
/// async fn random_sample(engine: &dyn SearchEngine, shelf: u64) -> Result<u64> {
///     let query = engine.query(Some(Crosswalk::Opds)).bookshelf_id(shelf).order_by(OrderBy::Random, None);
///     let result = engine.execute(&query, 1, 15).await?;
///     Ok(result.total)
/// }
/// ```
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Name of the engine, used for logging only.
    fn name(&self) -> &str;

    /// Start a new query with the given output crosswalk.
    fn query(&self, crosswalk: Option<Crosswalk>) -> Query {
        Query::new(crosswalk)
    }

    /// Execute a query and return one page of results.
    ///
    /// `page` is 1-based. Callers are expected to have clamped both `page`
    /// and `page_size` already.
    async fn execute(&self, query: &Query, page: u32, page_size: u32) -> Result<FeedResult>;

    /// Count the publications matching a query.
    ///
    /// Default implementation executes the query for a single result and
    /// reports its total.
    async fn count(&self, query: &Query) -> Result<u64> {
        self.execute(query, 1, 1).await.map(|result| result.total)
    }

    /// Direct children of a classification node, in engine order. An empty
    /// `code` returns the top level of the tree; unknown codes have no
    /// children.
    async fn classification_children(&self, code: &str) -> Result<Vec<ClassificationNode>>;

    /// Every subject heading with its publication count, in engine order.
    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    async fn subject_name(&self, id: u64) -> Result<Option<String>>;

    /// The `limit` most frequent subjects among (at most `max_docs` of) the
    /// publications matching a query, most frequent first.
    async fn top_subjects_for_query(&self, query: &Query, limit: usize, max_docs: usize) -> Result<Vec<TopSubject>>;
}
