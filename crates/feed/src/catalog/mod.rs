//! Feed assembly: one async function per catalog route.
//!
//! Navigation feeds read the [`NavigationCache`] snapshot first and fall back
//! to live engine queries on a miss. Leaf listings always query the engine
//! live. A request loads the snapshot once and uses it throughout, so every
//! cached value in one feed comes from the same rebuild.

mod bookshelves;
#[cfg(test)]
mod fixtures;
mod loccs;
mod search;
mod subjects;

use crate::compose::{QueryDescriptor, Route, Variation};
use crate::error::{ErrorKind, Result};
use crate::facets::build_facets;
use crate::href::{QueryParams, build_url};
use crate::opds::{Feed, Link, Metadata, REL_NEW, REL_POPULAR, REL_RANDOM};
use crate::params::RawParams;
use exn::ResultExt;
use folio_cache::NavigationCache;
use folio_config::FeedConfig;
use folio_search::constants::Crosswalk;
use folio_search::{EngineHandle, TopSubject};
use std::sync::Arc;

/// Handle passed to request handlers: the search engine, the navigation
/// cache and the feed settings.
#[derive(Clone)]
pub struct Catalog {
    engine: EngineHandle,
    cache: Arc<NavigationCache>,
    config: FeedConfig,
}

/// What distinguishes one route's leaf listing from another's.
struct Listing {
    title: String,
    up: String,
    search: String,
    failure: &'static str,
    top_subjects: bool,
}

impl Catalog {
    pub fn new(engine: EngineHandle, cache: Arc<NavigationCache>, config: FeedConfig) -> Self {
        Self { engine, cache, config }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn cache(&self) -> &Arc<NavigationCache> {
        &self.cache
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// The root navigation feed.
    pub fn index(&self) -> Feed {
        let search = |params: QueryParams| self.href_with("search", &params);
        let mut feed = Feed::new(Metadata::titled(self.config.title.as_str()), vec![
            Link::new("self", self.root()),
            Link::new("start", self.root()),
            Link::templated("search", format!("{}{{?query}}", self.href("search"))),
        ]);
        feed.navigation = Some(vec![
            Link::navigation(
                search(QueryParams::new().with("field", "fuzzy")),
                "I'm not sure how to spell what I'm looking for",
            ),
            Link::navigation(search(QueryParams::new().with("field", "fts")), "Advanced Search"),
            Link::navigation(self.href("bookshelves"), "Browse Bookshelves"),
            Link::navigation(self.href("loccs"), "Browse by Library of Congress Code"),
            Link::navigation(self.href("subjects"), "Browse by Subject"),
            Link::navigation(
                search(QueryParams::new().with("audiobook", "true").with("sort", "downloads")),
                "Browse Audiobooks",
            ),
            Link::new(REL_POPULAR, search(QueryParams::new().with("sort", "downloads").with("sort_order", "desc")))
                .titled("Most Popular"),
            Link::new(REL_NEW, search(QueryParams::new().with("sort", "release_date").with("sort_order", "desc")))
                .titled("Recently Added"),
            Link::new(REL_RANDOM, search(QueryParams::new().with("sort", "random"))).titled("Random"),
        ]);
        feed
    }

    fn compose(&self, route: Route, params: &RawParams) -> QueryDescriptor {
        QueryDescriptor::compose(route, params, self.config.default_limit)
    }

    fn href(&self, segment: &str) -> String {
        format!("{}/{segment}", self.config.base_path)
    }

    fn href_with(&self, segment: &str, params: &QueryParams) -> String {
        build_url(&self.href(segment), params)
    }

    fn root(&self) -> String {
        self.href("")
    }

    /// A search link template that appends the free text to `segment` with
    /// the given fixed parameters.
    fn search_template(&self, segment: &str, params: &QueryParams) -> String {
        let href = self.href_with(segment, params);
        if href.contains('?') { format!("{href}{{&query}}") } else { format!("{href}{{?query}}") }
    }

    /// One page of publications with facets and pagination.
    ///
    /// The results query and the optional top-subjects query run
    /// concurrently. Only the results query can fail the feed; a failed
    /// top-subjects lookup just leaves that facet out.
    async fn leaf_listing(&self, descriptor: &QueryDescriptor, listing: Listing) -> Result<Feed> {
        let query = descriptor.to_query(Crosswalk::Opds);
        let wants_subjects = listing.top_subjects;
        let subjects = async {
            if wants_subjects { self.top_subjects(descriptor).await } else { None }
        };
        let (result, subjects) =
            futures::join!(self.engine.execute(&query, descriptor.page(), descriptor.page_size()), subjects);
        let result = result
            .inspect_err(|err| tracing::error!(route = descriptor.route().segment(), error = ?err, "Live query failed"))
            .or_raise(|| ErrorKind::SearchFailure(listing.failure))?;

        let base_path = self.config.base_path.as_str();
        let mut links = vec![
            Link::new("self", descriptor.vary(Variation::Page(result.page)).url(base_path)),
            Link::new("start", self.root()),
            Link::new("up", listing.up),
            Link::templated("search", listing.search),
        ];
        links.extend(pagination_links(descriptor, base_path, result.page, result.total_pages));

        let metadata = Metadata {
            title: listing.title,
            number_of_items: Some(result.total),
            items_per_page: Some(result.page_size),
            current_page: Some(result.page),
        };
        let mut feed = Feed::new(metadata, links);
        feed.facets = Some(build_facets(descriptor, base_path, subjects.as_deref()));
        feed.publications = Some(result.results);
        Ok(feed)
    }

    async fn top_subjects(&self, descriptor: &QueryDescriptor) -> Option<Vec<TopSubject>> {
        let query = descriptor.to_subjects_query();
        self.engine
            .top_subjects_for_query(&query, self.config.top_subjects_limit, self.config.top_subjects_max_docs)
            .await
            .inspect_err(|err| tracing::warn!(error = ?err, "Top subjects lookup failed"))
            .ok()
    }
}

/// `first`/`previous` when past the first page, `next`/`last` when before
/// the last one.
fn pagination_links(descriptor: &QueryDescriptor, base_path: &str, page: u32, total_pages: u32) -> Vec<Link> {
    let link = |rel: &str, page: u32| Link::new(rel, descriptor.vary(Variation::Page(page)).url(base_path));
    let mut links = Vec::with_capacity(4);
    if page > 1 {
        links.push(link("first", 1));
        links.push(link("previous", page - 1));
    }
    if page < total_pages {
        links.push(link("next", page + 1));
        links.push(link("last", total_pages));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::fixtures::{catalog, corpus};
    use super::*;
    use rstest::rstest;

    fn rels(links: &[Link]) -> Vec<&str> {
        links.iter().filter_map(|link| link.rel.as_deref()).collect()
    }

    #[rstest]
    #[case(1, &["next", "last"])]
    #[case(3, &["first", "previous", "next", "last"])]
    #[case(5, &["first", "previous"])]
    fn test_pagination_links(#[case] page: u32, #[case] expected: &[&str]) {
        let descriptor = QueryDescriptor::compose(Route::Search, &RawParams::from_query("query=sea"), 28);
        let links = pagination_links(&descriptor, "/opds", page, 5);
        assert_eq!(rels(&links), expected);
    }

    #[test]
    fn test_pagination_link_targets() {
        let descriptor = QueryDescriptor::compose(Route::Bookshelves, &RawParams::from_query("id=644&page=3"), 28);
        let links = pagination_links(&descriptor, "/opds", 3, 5);
        let hrefs: Vec<_> = links.iter().map(|link| link.href.as_str()).collect();
        assert_eq!(hrefs, [
            "/opds/bookshelves?id=644&limit=28&page=1",
            "/opds/bookshelves?id=644&limit=28&page=2",
            "/opds/bookshelves?id=644&limit=28&page=4",
            "/opds/bookshelves?id=644&limit=28&page=5",
        ]);
    }

    #[test]
    fn test_single_or_empty_result_has_no_pagination() {
        let descriptor = QueryDescriptor::compose(Route::Search, &RawParams::default(), 28);
        assert!(pagination_links(&descriptor, "/opds", 1, 1).is_empty());
        assert!(pagination_links(&descriptor, "/opds", 1, 0).is_empty());
    }

    #[test]
    fn test_index() {
        let (catalog, _) = catalog(corpus());
        let feed = catalog.index();
        assert_eq!(feed.metadata.title, "Project Gutenberg Catalog");
        assert_eq!(rels(&feed.links), ["self", "start", "search"]);
        assert_eq!(feed.link("self").unwrap().href, "/opds/");
        assert_eq!(feed.link("search").unwrap().href, "/opds/search{?query}");
        assert_eq!(feed.link("search").unwrap().templated, Some(true));

        let navigation = feed.navigation.unwrap();
        let hrefs: Vec<_> = navigation.iter().map(|link| link.href.as_str()).collect();
        assert_eq!(hrefs, [
            "/opds/search?field=fuzzy",
            "/opds/search?field=fts",
            "/opds/bookshelves",
            "/opds/loccs",
            "/opds/subjects",
            "/opds/search?audiobook=true&sort=downloads",
            "/opds/search?sort=downloads&sort_order=desc",
            "/opds/search?sort=release_date&sort_order=desc",
            "/opds/search?sort=random",
        ]);
        assert_eq!(navigation[6].rel.as_deref(), Some(REL_POPULAR));
        assert_eq!(navigation[8].title.as_deref(), Some("Random"));
    }

    #[test]
    fn test_base_path_is_configurable() {
        let (catalog, _) = catalog(corpus());
        let catalog = Catalog::new(
            Arc::clone(catalog.engine()),
            Arc::clone(catalog.cache()),
            FeedConfig { base_path: "/catalog/opds".into(), ..FeedConfig::default() },
        );
        let feed = catalog.index();
        assert_eq!(feed.link("start").unwrap().href, "/catalog/opds/");
        assert_eq!(feed.navigation.unwrap()[2].href, "/catalog/opds/bookshelves");
    }
}
