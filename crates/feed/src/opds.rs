//! OPDS 2.0 feed documents.
//!
//! Only the parts of the format the catalog produces are modelled. Every
//! type serializes to the JSON shape clients expect; optional members are
//! left out rather than written as `null`.

use folio_search::Publication;
use serde::Serialize;

/// Media type of every feed and of every link between feeds.
pub const OPDS_TYPE: &str = "application/opds+json";

pub const REL_POPULAR: &str = "http://opds-spec.org/sort/popular";
pub const REL_NEW: &str = "http://opds-spec.org/sort/new";
pub const REL_RANDOM: &str = "http://opds-spec.org/sort/random";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub metadata: Metadata,
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<Publication>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<Facet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
}

impl Feed {
    pub fn new(metadata: Metadata, links: Vec<Link>) -> Self {
        Self {
            metadata,
            links,
            navigation: None,
            publications: None,
            facets: None,
            groups: None,
        }
    }

    /// The first link with the given relation.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.rel.as_deref() == Some(rel))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
}

impl Metadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn counted(title: impl Into<String>, number_of_items: u64) -> Self {
        Self {
            title: title.into(),
            number_of_items: Some(number_of_items),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            href: href.into(),
            media_type: OPDS_TYPE,
            title: None,
            templated: None,
        }
    }

    /// A link whose href is a URI template.
    pub fn templated(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            templated: Some(true),
            ..Self::new(rel, href)
        }
    }

    /// A navigation entry.
    pub fn navigation(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new("subsection", href).titled(title)
    }

    /// A facet option; the active option of a group carries `rel: self`.
    pub fn facet(href: impl Into<String>, title: impl Into<String>, active: bool) -> Self {
        Self {
            rel: active.then(|| "self".to_string()),
            ..Self::untyped(href, title)
        }
    }

    /// A titled link with no relation.
    pub fn untyped(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            rel: None,
            href: href.into(),
            media_type: OPDS_TYPE,
            title: Some(title.into()),
            templated: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.rel.as_deref() == Some("self")
    }
}

/// A named group of alternative links, at most one of them active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub metadata: Metadata,
    pub links: Vec<Link>,
}

impl Facet {
    pub fn new(title: impl Into<String>, links: Vec<Link>) -> Self {
        Self {
            metadata: Metadata::titled(title),
            links,
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.is_active())
    }
}

/// A titled sample of publications inside a navigation feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub metadata: Metadata,
    pub links: Vec<Link>,
    pub publications: Vec<Publication>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_feed_shape() {
        let mut feed = Feed::new(
            Metadata {
                title: "Adventure".into(),
                number_of_items: Some(0),
                items_per_page: Some(28),
                current_page: Some(1),
            },
            vec![Link::new("self", "/opds/bookshelves?id=644"), Link::templated("search", "/opds/search{?query}")],
        );
        feed.publications = Some(vec![]);
        let value = serde_json::to_value(&feed).unwrap();
        assert_eq!(
            value,
            json!({
                "metadata": {"title": "Adventure", "numberOfItems": 0, "itemsPerPage": 28, "currentPage": 1},
                "links": [
                    {"rel": "self", "href": "/opds/bookshelves?id=644", "type": "application/opds+json"},
                    {"rel": "search", "href": "/opds/search{?query}", "type": "application/opds+json", "templated": true},
                ],
                "publications": [],
            })
        );
    }

    #[test]
    fn test_facet_links() {
        let facet = Facet::new("Format", vec![Link::facet("/a", "Any", false), Link::facet("/b", "Text", true)]);
        let value = serde_json::to_value(&facet).unwrap();
        assert_eq!(value["links"][0], json!({"href": "/a", "type": "application/opds+json", "title": "Any"}));
        assert_eq!(value["links"][1]["rel"], "self");
        assert_eq!(facet.active().count(), 1);
    }
}
