use super::{Catalog, Listing};
use crate::compose::Route;
use crate::error::{ErrorKind, Result};
use crate::href::QueryParams;
use crate::opds::Feed;
use crate::params::RawParams;
use folio_search::Scope;

impl Catalog {
    /// `/search`: publications across the catalog, optionally narrowed to a
    /// classification (`locc`).
    pub async fn search(&self, params: &RawParams) -> Result<Feed> {
        let descriptor = self.compose(Route::Search, params);
        let narrowed = matches!(descriptor.scope(), Scope::Classification(_)) || descriptor.language().is_some();
        let listing = Listing {
            title: self.config.search_title.clone(),
            up: self.root(),
            search: self.search_template("search", &QueryParams::new().with("field", descriptor.field().unwrap_or_default())),
            failure: ErrorKind::SEARCH_FAILED,
            top_subjects: descriptor.has_text() || narrowed,
        };
        self.leaf_listing(&descriptor, listing).await
    }
}
