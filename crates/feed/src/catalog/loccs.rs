use super::{Catalog, Listing};
use crate::compose::Route;
use crate::error::{ErrorKind, Result};
use crate::href::QueryParams;
use crate::opds::{Feed, Link, Metadata};
use crate::params::RawParams;
use exn::ResultExt;
use folio_cache::Snapshot;
use folio_search::constants::MainClass;
use folio_search::error::Result as SearchResult;
use folio_search::{ClassificationNode, Scope};
use futures::future;

impl Catalog {
    /// `/loccs`: the children of `parent` in the classification tree, or the
    /// publications classified under it when it has none.
    pub async fn loccs(&self, params: &RawParams) -> Result<Feed> {
        let descriptor = self.compose(Route::Classification, params);
        let parent = match descriptor.scope() {
            Scope::Classification(code) => code.clone(),
            _ => String::new(),
        };
        let snapshot = self.cache.snapshot();
        let children = self
            .classification_children(&snapshot, &parent)
            .await
            .inspect_err(|err| tracing::error!(code = %parent, error = ?err, "Classification lookup failed"))
            .unwrap_or_default();
        if !children.is_empty() {
            return self.classification_navigation(&snapshot, &parent, children).await;
        }

        let listing = Listing {
            up: self.href("loccs"),
            search: self.search_template("loccs", &QueryParams::new().with("parent", parent.as_str())),
            title: parent,
            failure: ErrorKind::BROWSE_FAILED,
            top_subjects: true,
        };
        self.leaf_listing(&descriptor, listing).await
    }

    async fn classification_navigation(
        &self,
        snapshot: &Snapshot,
        parent: &str,
        mut children: Vec<ClassificationNode>,
    ) -> Result<Feed> {
        ClassificationNode::sort(&mut children);
        let counts = future::try_join_all(children.iter().map(|child| self.child_count(snapshot, child)))
            .await
            .inspect_err(|err| tracing::error!(code = parent, error = ?err, "Classification counts failed"))
            .or_raise(|| ErrorKind::SearchFailure(ErrorKind::BROWSE_FAILED))?;

        let navigation = children
            .iter()
            .zip(counts)
            .map(|(child, count)| {
                let unit = if child.has_children { "subcategories" } else { "books" };
                let href = self.href_with("loccs", &QueryParams::new().with("parent", child.code.as_str()));
                Link::navigation(href, format!("{} ({count} {unit})", child.display_label()))
            })
            .collect();

        let title = match parent {
            "" => "Library of Congress Classification".to_string(),
            code => MainClass::find(code).map_or_else(|| format!("Classification: {code}"), |class| class.label.to_string()),
        };
        let (this, up) = match parent {
            "" => (self.href("loccs"), self.root()),
            code => (self.href_with("loccs", &QueryParams::new().with("parent", code)), self.href("loccs")),
        };
        let mut feed = Feed::new(Metadata::counted(title, children.len() as u64), vec![
            Link::new("self", this),
            Link::new("start", self.root()),
            Link::new("up", up),
        ]);
        feed.navigation = Some(navigation);
        Ok(feed)
    }

    /// Number of subcategories of an interior node, or of books under a leaf.
    async fn child_count(&self, snapshot: &Snapshot, child: &ClassificationNode) -> SearchResult<u64> {
        if child.has_children {
            return Ok(self.classification_children(snapshot, &child.code).await?.len() as u64);
        }
        if let Some(count) = snapshot.leaf_count(&child.code) {
            return Ok(count);
        }
        tracing::debug!(code = %child.code, "Classification count not cached, counting live");
        self.engine.count(&self.engine.query(None).classification_code(&child.code)).await
    }

    async fn classification_children(&self, snapshot: &Snapshot, code: &str) -> SearchResult<Vec<ClassificationNode>> {
        if let Some(children) = snapshot.children(code) {
            return Ok(children.to_vec());
        }
        tracing::debug!(code, "Classification children not cached, fetching live");
        self.engine.classification_children(code).await
    }
}
