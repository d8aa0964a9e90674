//! Navigation cache for catalog feeds.
//!
//! Some navigation feeds need aggregates that are expensive to compute on
//! every request: a random sample of every curated bookshelf, the children
//! and book counts of the classification tree, and the full subject ranking.
//! This crate keeps them in a warm [`Snapshot`] that is rebuilt as a whole
//! and swapped in atomically.
//!
//! # Architecture
//! - **Snapshot**: an immutable map from [`CacheKey`] to [`CachedValue`].
//!   Once published it never changes; readers holding one always see a
//!   single, complete rebuild.
//! - **Rebuild**: three independent warm jobs (bookshelf samples,
//!   classification tree, subject ranking) fill a fresh map. Failures are
//!   logged per shelf, per top-level class, or per job and simply leave keys
//!   out. The finished map replaces the published snapshot in one swap.
//! - **Trigger**: rebuilds only happen when asked for, either directly
//!   ([`NavigationCache::rebuild`]) or on a fixed period
//!   ([`NavigationCache::spawn_refresh`], or
//!   [`NavigationCache::spawn_configured_refresh`] for the configured one). Entries never expire on their own;
//!   [`Snapshot::age`] tells callers how stale the data is.
//!
//! A lookup miss is never an error: callers compute the value live instead.

mod cache;
pub mod error;
mod snapshot;
mod warm;

pub use crate::cache::{MIN_REFRESH_PERIOD, NavigationCache};
pub use crate::snapshot::{CacheKey, CachedValue, Sample, Snapshot};
pub use crate::warm::sample_shelf;
