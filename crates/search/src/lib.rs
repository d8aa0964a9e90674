//! Search engine interface for the folio catalog.
//!
//! The full-text/faceted search service is an external collaborator: this
//! crate only describes how the rest of the workspace talks to it.
//!
//! - [`Query`]: an engine-agnostic, chainable description of one search
//!   (scope, free text, filters, ordering).
//! - [`SearchEngine`]: the async trait an engine client implements.
//! - [`constants`]: enumerated values and the static catalog data (curated
//!   bookshelves, offered languages, classification main classes).
//!
//! Enable the `mock` feature (in dev-dependencies) for [`MockEngine`], an
//! in-memory engine over a fixture corpus.

pub mod constants;
mod engine;
pub mod error;
mod models;
mod query;

pub use crate::engine::SearchEngine;
#[cfg(feature = "mock")]
pub use crate::engine::{Call, Failure, MockBook, MockEngine};
pub use crate::models::{ClassificationNode, FeedResult, Publication, Subject, TopSubject};
pub use crate::query::{Format, Ordering, Query, Rights, Scope};
use std::sync::Arc;

pub type EngineHandle = Arc<dyn SearchEngine + Send + Sync>;
