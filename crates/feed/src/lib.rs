//! OPDS 2.0 catalog feeds.
//!
//! Turns raw request parameters into JSON-serializable feeds for browsing
//! and searching the catalog. The HTTP transport is out of scope: a handler
//! parses the query string into [`RawParams`], calls the matching
//! [`Catalog`] route and serializes the returned [`Feed`] (or answers with
//! the error's [`status`](error::ErrorKind::status)).
//!
//! ```no_run
//! use folio_cache::NavigationCache;
//! use folio_config::Config;
//! use folio_feed::{Catalog, RawParams};
//! use folio_search::EngineHandle;
//! use std::sync::Arc;
//!
//! # async fn handle(engine: EngineHandle, config: Config, query_string: &str) {
//! let cache = Arc::new(NavigationCache::new(config.cache.clone()));
//! if Arc::clone(&cache).spawn_configured_refresh(Arc::clone(&engine)).is_none() {
//!     cache.rebuild(&*engine).await;
//! }
//! let catalog = Catalog::new(engine, cache, config.feed);
//!
//! match catalog.search(&RawParams::from_query(query_string)).await {
//!     Ok(feed) => println!("{}", serde_json::to_string(&feed).unwrap()),
//!     Err(err) => eprintln!("{} {}", err.status(), &*err),
//! }
//! # }
//! ```

mod catalog;
mod compose;
pub mod error;
mod facets;
mod href;
pub mod opds;
mod params;

pub use crate::catalog::Catalog;
pub use crate::compose::{QueryDescriptor, Route, Variation};
pub use crate::facets::build_facets;
pub use crate::href::{QueryParams, build_url};
pub use crate::opds::Feed;
pub use crate::params::RawParams;
