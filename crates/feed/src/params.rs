//! Raw request parameters, exactly as received.

use serde::Deserialize;
use std::borrow::Cow;

/// The query string of a feed request, before any validation.
///
/// Every field is optional and untrusted; [`QueryDescriptor::compose`]
/// applies defaults and bounds. Transport layers can deserialize this
/// directly, or build it from a raw query string with
/// [`from_query`](Self::from_query).
///
/// [`QueryDescriptor::compose`]: crate::QueryDescriptor::compose
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawParams {
    pub id: Option<String>,
    pub category: Option<String>,
    pub parent: Option<String>,
    pub locc: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub query: Option<String>,
    pub field: Option<String>,
    pub lang: Option<String>,
    pub copyrighted: Option<String>,
    pub audiobook: Option<String>,
    pub sort: Option<String>,
    pub sort_order: Option<String>,
}

impl RawParams {
    /// Parses an `application/x-www-form-urlencoded` query string (without
    /// the leading `?`). Unknown keys are ignored; a repeated key keeps its
    /// last value.
    ///
    /// ```
    /// use folio_feed::RawParams;
    ///
    /// let params = RawParams::from_query("query=moby+dick&page=2&utm=x");
    /// assert_eq!(params.query.as_deref(), Some("moby dick"));
    /// assert_eq!(params.page.as_deref(), Some("2"));
    /// assert_eq!(params.id, None);
    /// ```
    pub fn from_query(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes()).collect()
    }

    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        Some(match key {
            "id" => &mut self.id,
            "category" => &mut self.category,
            "parent" => &mut self.parent,
            "locc" => &mut self.locc,
            "page" => &mut self.page,
            "limit" => &mut self.limit,
            "query" => &mut self.query,
            "field" => &mut self.field,
            "lang" => &mut self.lang,
            "copyrighted" => &mut self.copyrighted,
            "audiobook" => &mut self.audiobook,
            "sort" => &mut self.sort,
            "sort_order" => &mut self.sort_order,
            _ => return None,
        })
    }
}

impl<'a> FromIterator<(Cow<'a, str>, Cow<'a, str>)> for RawParams {
    fn from_iter<I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            if let Some(slot) = params.slot(&key) {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}
