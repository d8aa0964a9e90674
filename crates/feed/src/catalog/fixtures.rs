//! Shared fixture corpus for catalog tests.

use super::Catalog;
use folio_cache::NavigationCache;
use folio_config::{CacheConfig, FeedConfig};
use folio_search::{EngineHandle, MockBook, MockEngine};
use std::sync::Arc;

/// - 25 public-domain books classified `B`, downloads rising with the id.
/// - 3 copyrighted `BF` books.
/// - A handful of literature and science books on curated shelves 644 and
///   671, one of them a French audiobook.
pub(crate) fn corpus() -> MockEngine {
    let philosophy = (1..=25).map(|id| MockBook::new(id, format!("Philosophy {id:02}")).classified("B").downloads(id * 10).about(3));
    let psychology = (26..=28).map(|id| MockBook::new(id, format!("Psychology {id}")).classified("BF").copyrighted().about(3));
    MockEngine::default()
        .with_books(philosophy)
        .with_books(psychology)
        .with_books([
            MockBook::new(30, "Treasure Island").by("Stevenson").on_shelf(644).classified("PR").downloads(900).about(1),
            MockBook::new(31, "Kidnapped").by("Stevenson").on_shelf(644).classified("PR").downloads(400).about(1),
            MockBook::new(32, "Origin of Species").by("Darwin").on_shelf(671).classified("QH").about(2),
            MockBook::new(33, "Le Tour du monde").by("Verne").on_shelf(644).classified("PQ").in_language("fr").audiobook().about(1),
        ])
        .with_classes([
            ("B", "Philosophy, Psychology, Religion"),
            ("BF", "BF: Psychology"),
            ("BJ", "BJ: Ethics"),
            ("P", "Language and Literature"),
            ("PR", "PR: English literature"),
            ("PR1", "PR1: General"),
            ("PQ", "PQ: French literature"),
            ("Q", "Science"),
            ("QH", "QH: Natural history"),
        ])
        .with_subjects([(1, "Adventure stories"), (2, "Evolution"), (3, "Philosophy")])
}

/// A catalog over `engine` with an empty cache, plus a handle on the engine
/// for inspecting recorded calls.
pub(crate) fn catalog(engine: MockEngine) -> (Catalog, Arc<MockEngine>) {
    catalog_with(engine, CacheConfig::default())
}

pub(crate) fn catalog_with(engine: MockEngine, cache: CacheConfig) -> (Catalog, Arc<MockEngine>) {
    let engine = Arc::new(engine);
    let handle: EngineHandle = engine.clone();
    let catalog = Catalog::new(handle, Arc::new(NavigationCache::new(cache)), FeedConfig::default());
    (catalog, engine)
}
