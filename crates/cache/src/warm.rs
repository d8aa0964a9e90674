//! The warm cycle: three independent jobs filling a fresh snapshot.
//!
//! Each job writes into a map owned by the rebuild; nothing is visible to
//! readers until [`NavigationCache::rebuild`](crate::NavigationCache::rebuild)
//! publishes the finished snapshot. A failed job (or a failed part of one)
//! is logged and leaves its keys out, so readers fall back to live queries
//! for exactly the data that could not be warmed.

use crate::error::{ErrorKind, Result};
use crate::snapshot::{CacheKey, CachedValue, Sample, Snapshot};
use exn::ResultExt;
use folio_config::CacheConfig;
use folio_search::constants::{BookshelfCategory, Crosswalk, OrderBy};
use folio_search::error::Result as SearchResult;
use folio_search::{SearchEngine, Subject};
use futures::future::{BoxFuture, FutureExt};
use futures::{StreamExt, stream};
use std::collections::HashMap;
use std::time::Instant;
use tracing::instrument;

type Entries = HashMap<CacheKey, CachedValue>;

/// Fetches a random sample of a bookshelf, as cached by the warm cycle.
///
/// Also used for live fallback when a sample is missing from the cache, so
/// both paths show the same kind of sample.
pub async fn sample_shelf(engine: &dyn SearchEngine, shelf_id: u64, limit: u32) -> SearchResult<Sample> {
    let query = engine.query(Some(Crosswalk::Opds)).bookshelf_id(shelf_id).order_by(OrderBy::Random, None);
    engine.execute(&query, 1, limit).await.map(Sample::from)
}

/// Runs every warm job and assembles the resulting snapshot.
pub(crate) async fn build(engine: &dyn SearchEngine, config: &CacheConfig, generation: u64) -> Snapshot {
    tracing::info!(engine = engine.name(), generation, "Starting navigation cache warm");
    let started = Instant::now();
    let mut entries = Entries::new();

    warm_bookshelves(engine, config, &mut entries).await;
    if let Err(err) = warm_classification(engine, &mut entries).await {
        tracing::warn!(error = ?err, "Cache warm skipped classification tree");
    }
    if let Err(err) = warm_subjects(engine, &mut entries).await {
        tracing::warn!(error = ?err, "Cache warm skipped subject ranking");
    }

    let snapshot = Snapshot::built(entries, generation);
    tracing::info!(
        entries = snapshot.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Navigation cache warm complete"
    );
    snapshot
}

/// Samples every curated shelf. Shelves are independent: a failed sample is
/// logged and the remaining shelves are still cached.
#[instrument(level = "debug", skip_all)]
async fn warm_bookshelves(engine: &dyn SearchEngine, config: &CacheConfig, entries: &mut Entries) {
    let limit = config.sample_limit;
    // Boxed up front so the pipeline stays `Send` inside spawned refresh tasks.
    let jobs: Vec<BoxFuture<'_, (u64, Result<Sample>)>> = BookshelfCategory::all_shelves()
        .map(|&(shelf_id, _)| shelf_id)
        .map(move |shelf_id| {
            async move {
                let sample = sample_shelf(engine, shelf_id, limit).await.or_raise(|| ErrorKind::Bookshelf(shelf_id));
                (shelf_id, sample)
            }
            .boxed()
        })
        .collect();
    let samples: Vec<(u64, Result<Sample>)> = stream::iter(jobs)
        .buffer_unordered(config.warm_concurrency.max(1))
        .collect()
        .await;
    for (shelf_id, sample) in samples {
        match sample {
            Ok(sample) => {
                entries.insert(CacheKey::BookshelfSample(shelf_id), CachedValue::Sample(sample));
            },
            Err(err) => tracing::warn!(shelf = shelf_id, error = ?err, "Cache warm failed for bookshelf sample"),
        }
    }
}

/// Caches the top level of the tree and the children of every top-level
/// class, then one level further: children of interior children, and book
/// counts of leaf children.
///
/// Only a failure listing the top level aborts the job; failures below a
/// top-level class are isolated to that class.
#[instrument(level = "debug", skip_all)]
async fn warm_classification(engine: &dyn SearchEngine, entries: &mut Entries) -> Result<()> {
    let top = engine.classification_children("").await.or_raise(|| ErrorKind::Classification(String::new()))?;
    entries.insert(CacheKey::ClassificationChildren(String::new()), CachedValue::Children(top.clone()));
    for class in top {
        if let Err(err) = warm_class(engine, &class.code, entries).await {
            tracing::warn!(code = %class.code, error = ?err, "Cache warm failed for classification");
        }
    }
    Ok(())
}

async fn warm_class(engine: &dyn SearchEngine, code: &str, entries: &mut Entries) -> Result<()> {
    let raise = || ErrorKind::Classification(code.to_string());
    let children = engine.classification_children(code).await.or_raise(raise)?;
    entries.insert(CacheKey::ClassificationChildren(code.to_string()), CachedValue::Children(children.clone()));
    for child in children {
        if child.has_children {
            let grandchildren = engine.classification_children(&child.code).await.or_raise(raise)?;
            entries.insert(CacheKey::ClassificationChildren(child.code), CachedValue::Children(grandchildren));
        } else {
            let query = engine.query(None).classification_code(&child.code);
            let count = engine.count(&query).await.or_raise(raise)?;
            entries.insert(CacheKey::ClassificationCount(child.code), CachedValue::LeafCount(count));
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip_all)]
async fn warm_subjects(engine: &dyn SearchEngine, entries: &mut Entries) -> Result<()> {
    let mut subjects = engine.list_subjects().await.or_raise(|| ErrorKind::Subjects)?;
    Subject::rank(&mut subjects);
    entries.insert(CacheKey::Subjects, CachedValue::Subjects(subjects));
    Ok(())
}
