use super::{Catalog, Listing};
use crate::compose::Route;
use crate::error::{ErrorKind, Result};
use crate::href::QueryParams;
use crate::opds::{Feed, Group, Link, Metadata};
use crate::params::RawParams;
use exn::OptionExt;
use folio_cache::{CacheKey, CachedValue, Sample, Snapshot, sample_shelf};
use folio_config::SamplePolicy;
use folio_search::Scope;
use folio_search::constants::{BookshelfCategory, CURATED_BOOKSHELVES};
use futures::future;

impl Catalog {
    /// `/bookshelves`: a shelf's publications (`id`), a category's shelves
    /// with samples (`category`), or the list of categories.
    pub async fn bookshelves(&self, params: &RawParams) -> Result<Feed> {
        let descriptor = self.compose(Route::Bookshelves, params);
        if let Scope::Bookshelf(shelf_id) = *descriptor.scope() {
            let (title, up) = match BookshelfCategory::owning(shelf_id) {
                Some((category, name)) => (name.to_string(), self.category_href(category)),
                None => (format!("Bookshelf {shelf_id}"), self.href("bookshelves")),
            };
            let listing = Listing {
                title,
                up,
                search: self.search_template("bookshelves", &QueryParams::new().with("id", shelf_id.to_string())),
                failure: ErrorKind::BROWSE_FAILED,
                top_subjects: true,
            };
            return self.leaf_listing(&descriptor, listing).await;
        }
        match params.category.as_deref() {
            Some(name) => self.bookshelf_category(name).await,
            None => Ok(self.bookshelf_categories()),
        }
    }

    fn bookshelf_categories(&self) -> Feed {
        let mut feed = Feed::new(Metadata::counted("Bookshelves", CURATED_BOOKSHELVES.len() as u64), vec![
            Link::new("self", self.href("bookshelves")),
            Link::new("start", self.root()),
            Link::new("up", self.root()),
        ]);
        feed.navigation = Some(
            CURATED_BOOKSHELVES
                .iter()
                .map(|category| {
                    let title = format!("{} ({} shelves)", category.genre, category.shelves.len());
                    Link::navigation(self.category_href(category), title)
                })
                .collect(),
        );
        feed
    }

    /// Every shelf of a category with its size, plus a sample group for
    /// each shelf that has publications.
    async fn bookshelf_category(&self, name: &str) -> Result<Feed> {
        let category =
            BookshelfCategory::find(name).ok_or_raise(|| ErrorKind::NotFound(format!("bookshelf category '{name}'")))?;
        let snapshot = self.cache.snapshot();
        let samples =
            future::join_all(category.shelves.iter().map(|&(shelf_id, _)| self.shelf_sample(&snapshot, shelf_id))).await;

        let mut navigation = Vec::with_capacity(category.shelves.len());
        let mut groups = Vec::new();
        for (&(shelf_id, shelf_name), sample) in category.shelves.iter().zip(samples) {
            let href = self.href_with("bookshelves", &QueryParams::new().with("id", shelf_id.to_string()));
            let count = sample.as_ref().map_or(0, |sample| sample.count);
            navigation.push(Link::navigation(href.as_str(), format!("{shelf_name} ({count} books)")));
            if let Some(sample) = sample.filter(|sample| !sample.result.is_empty()) {
                groups.push(Group {
                    metadata: Metadata::counted(shelf_name, count),
                    links: vec![Link::new("self", href)],
                    publications: sample.result.results,
                });
            }
        }

        let mut feed = Feed::new(Metadata::counted(category.genre, category.shelves.len() as u64), vec![
            Link::new("self", self.category_href(category)),
            Link::new("start", self.root()),
            Link::new("up", self.href("bookshelves")),
        ]);
        feed.navigation = Some(navigation);
        feed.groups = Some(groups);
        Ok(feed)
    }

    /// The cached sample of a shelf, or a live one on a miss. A failed live
    /// fetch is logged and yields nothing.
    async fn shelf_sample(&self, snapshot: &Snapshot, shelf_id: u64) -> Option<Sample> {
        if let Some(sample) = snapshot.sample(shelf_id) {
            return Some(sample.clone());
        }
        tracing::debug!(shelf = shelf_id, "Bookshelf sample not cached, fetching live");
        let config = self.cache.config();
        let sample = sample_shelf(&*self.engine, shelf_id, config.sample_limit)
            .await
            .inspect_err(|err| tracing::warn!(shelf = shelf_id, error = ?err, "Live bookshelf sample failed"))
            .ok()?;
        if config.sample_policy == SamplePolicy::WriteBack {
            self.cache.remember(CacheKey::BookshelfSample(shelf_id), CachedValue::Sample(sample.clone()));
        }
        Some(sample)
    }

    fn category_href(&self, category: &BookshelfCategory) -> String {
        self.href_with("bookshelves", &QueryParams::new().with("category", category.name))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{catalog, catalog_with, corpus};
    use super::*;
    use folio_cache::NavigationCache;
    use folio_config::CacheConfig;
    use folio_search::{Call, Failure, FeedResult, MockEngine, Publication};
    use serde_json::json;

    fn literature() -> &'static BookshelfCategory {
        BookshelfCategory::find("literature").unwrap()
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let (catalog, _) = catalog(corpus());
        let err = catalog.bookshelves(&RawParams::from_query("category=astrology")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn test_empty_shelf_listing() {
        let (catalog, _) = catalog(corpus());
        // Russian Literature has no fixture publications.
        let feed = catalog.bookshelves(&RawParams::from_query("id=650")).await.unwrap();
        assert_eq!(feed.metadata.title, "Russian Literature");
        assert_eq!(feed.metadata.number_of_items, Some(0));
        assert_eq!(feed.publications, Some(vec![]));
        let rels: Vec<_> = feed.links.iter().filter_map(|link| link.rel.as_deref()).collect();
        assert_eq!(rels, ["self", "start", "up", "search"]);
    }

    #[tokio::test]
    async fn test_shelf_listing() {
        let (catalog, engine) = catalog(corpus());
        let feed = catalog.bookshelves(&RawParams::from_query("id=644&limit=2")).await.unwrap();
        assert_eq!(feed.metadata.title, "Adventure");
        assert_eq!(feed.metadata.number_of_items, Some(3));
        assert_eq!(feed.metadata.items_per_page, Some(2));
        assert_eq!(feed.link("up").unwrap().href, "/opds/bookshelves?category=literature");
        assert_eq!(feed.link("search").unwrap().href, "/opds/bookshelves?id=644{&query}");
        assert_eq!(feed.link("self").unwrap().href, "/opds/bookshelves?id=644&limit=2&page=1");
        assert_eq!(feed.link("next").unwrap().href, "/opds/bookshelves?id=644&limit=2&page=2");
        let titles: Vec<_> = feed
            .publications
            .unwrap()
            .iter()
            .map(|publication| publication.as_json()["metadata"]["title"].clone())
            .collect();
        assert_eq!(titles, [json!("Treasure Island"), json!("Kidnapped")]);

        let facets = feed.facets.unwrap();
        let top = facets.iter().find(|facet| facet.metadata.title == "Top Subjects in Results").unwrap();
        assert_eq!(top.links[0].title.as_deref(), Some("Adventure stories (3)"));
        assert!(engine.calls().await.iter().any(|call| matches!(call, Call::TopSubjects(_))));
    }

    #[tokio::test]
    async fn test_unknown_shelf_id() {
        let (catalog, _) = catalog(corpus());
        let feed = catalog.bookshelves(&RawParams::from_query("id=9999")).await.unwrap();
        assert_eq!(feed.metadata.title, "Bookshelf 9999");
        assert_eq!(feed.link("up").unwrap().href, "/opds/bookshelves");
    }

    #[tokio::test]
    async fn test_shelf_listing_failure() {
        let (catalog, _) = catalog(corpus().with_failure(Failure::Bookshelf(644)));
        let err = catalog.bookshelves(&RawParams::from_query("id=644")).await.unwrap_err();
        assert_eq!(*err, ErrorKind::SearchFailure("Browse failed"));
        assert_eq!(err.status(), 500);
    }

    #[tokio::test]
    async fn test_top_subject_failure_omits_facet() {
        let (catalog, _) = catalog(corpus().with_failure(Failure::TopSubjects));
        let feed = catalog.bookshelves(&RawParams::from_query("id=644")).await.unwrap();
        let titles: Vec<_> = feed.facets.unwrap().into_iter().map(|facet| facet.metadata.title).collect();
        assert!(!titles.contains(&"Top Subjects in Results".to_string()));
        assert_eq!(feed.metadata.number_of_items, Some(3));
    }

    #[tokio::test]
    async fn test_category_list() {
        let (catalog, engine) = catalog(corpus());
        let feed = catalog.bookshelves(&RawParams::default()).await.unwrap();
        assert_eq!(feed.metadata, Metadata::counted("Bookshelves", CURATED_BOOKSHELVES.len() as u64));
        let navigation = feed.navigation.unwrap();
        assert_eq!(navigation.len(), CURATED_BOOKSHELVES.len());
        assert_eq!(navigation[0].href, "/opds/bookshelves?category=literature");
        assert_eq!(
            navigation[0].title.as_deref(),
            Some(format!("{} ({} shelves)", literature().genre, literature().shelves.len()).as_str())
        );
        assert!(engine.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_id_falls_back_to_category_list() {
        let (catalog, _) = catalog(corpus());
        let feed = catalog.bookshelves(&RawParams::from_query("id=adventure")).await.unwrap();
        assert_eq!(feed.metadata.title, "Bookshelves");
    }

    #[tokio::test]
    async fn test_category_samples_live_on_empty_cache() {
        let (catalog, engine) = catalog(corpus());
        let feed = catalog.bookshelves(&RawParams::from_query("category=literature")).await.unwrap();
        assert_eq!(feed.metadata.title, literature().genre);
        assert_eq!(feed.metadata.number_of_items, Some(literature().shelves.len() as u64));
        assert_eq!(feed.link("up").unwrap().href, "/opds/bookshelves");

        let navigation = feed.navigation.unwrap();
        assert_eq!(navigation.len(), literature().shelves.len());
        assert_eq!(navigation[0].title.as_deref(), Some("Adventure (3 books)"));
        assert_eq!(navigation[0].href, "/opds/bookshelves?id=644");

        // Only the shelf with publications gets a group.
        let groups = feed.groups.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].metadata, Metadata::counted("Adventure", 3));
        assert_eq!(groups[0].publications.len(), 3);

        let executes = engine.calls().await.iter().filter(|call| matches!(call, Call::Execute(_))).count();
        assert_eq!(executes, literature().shelves.len());
        // Request-scoped by default: nothing is written back.
        assert!(catalog.cache().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_category_uses_cached_samples() {
        let (catalog, engine) = catalog(corpus());
        catalog.cache().rebuild(&*engine).await;
        engine.clear_calls().await;

        let feed = catalog.bookshelves(&RawParams::from_query("category=literature")).await.unwrap();
        assert_eq!(feed.groups.unwrap().len(), 1);
        assert!(engine.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_injected_snapshot_is_served() {
        let publication = Publication::new(json!({"metadata": {"title": "Cached"}}));
        let snapshot = Snapshot::from_entries([(
            CacheKey::BookshelfSample(644),
            CachedValue::Sample(Sample { result: FeedResult::new(40, 1, 15, vec![publication]), count: 40 }),
        )]);
        let engine = std::sync::Arc::new(MockEngine::default());
        let catalog = Catalog::new(
            engine.clone(),
            std::sync::Arc::new(NavigationCache::with_snapshot(CacheConfig::default(), snapshot)),
            Default::default(),
        );
        let feed = catalog.bookshelves(&RawParams::from_query("category=literature")).await.unwrap();
        assert_eq!(feed.navigation.unwrap()[0].title.as_deref(), Some("Adventure (40 books)"));
        assert_eq!(feed.groups.unwrap()[0].publications[0].as_json()["metadata"]["title"], "Cached");
    }

    #[tokio::test]
    async fn test_failed_sample_is_absorbed() {
        let (catalog, _) = catalog(corpus().with_failure(Failure::Bookshelf(644)));
        let feed = catalog.bookshelves(&RawParams::from_query("category=literature")).await.unwrap();
        assert_eq!(feed.navigation.unwrap()[0].title.as_deref(), Some("Adventure (0 books)"));
        assert!(feed.groups.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_back_policy_publishes_samples() {
        let config = CacheConfig { sample_policy: SamplePolicy::WriteBack, ..CacheConfig::default() };
        let (catalog, engine) = catalog_with(corpus(), config);
        catalog.bookshelves(&RawParams::from_query("category=children")).await.unwrap();
        let snapshot = catalog.cache().snapshot();
        for (shelf_id, _) in BookshelfCategory::find("children").unwrap().shelves {
            assert!(snapshot.sample(*shelf_id).is_some());
        }

        engine.clear_calls().await;
        catalog.bookshelves(&RawParams::from_query("category=children")).await.unwrap();
        assert!(engine.calls().await.is_empty());
    }
}
