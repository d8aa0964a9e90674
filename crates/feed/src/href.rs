//! The single place feed links are rendered.

use url::form_urlencoded::Serializer;

/// Ordered query parameters for a feed link.
///
/// Order is preserved exactly as pushed, so links built from equal
/// parameters are byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. Empty values are kept here and dropped when the
    /// link is rendered.
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.0.push((key, value.into()));
        self
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Renders `path` with the non-empty parameters as a form-encoded query
/// string. No `?` is added when nothing remains.
///
/// ```
/// use folio_feed::{QueryParams, build_url};
///
/// let params = QueryParams::new().with("id", "644").with("lang", "").with("query", "war & peace");
/// assert_eq!(build_url("/opds/bookshelves", &params), "/opds/bookshelves?id=644&query=war+%26+peace");
/// assert_eq!(build_url("/opds/bookshelves", &QueryParams::new()), "/opds/bookshelves");
/// ```
pub fn build_url(path: &str, params: &QueryParams) -> String {
    let mut serializer = Serializer::new(String::new());
    for (key, value) in params.iter().filter(|(_, value)| !value.is_empty()) {
        serializer.append_pair(key, value);
    }
    let query = serializer.finish();
    if query.is_empty() { path.to_string() } else { format!("{path}?{query}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "/opds/search")]
    #[case(&[("query", "")], "/opds/search")]
    #[case(&[("query", "moby dick"), ("page", "2")], "/opds/search?query=moby+dick&page=2")]
    #[case(&[("page", "2"), ("query", "moby dick")], "/opds/search?page=2&query=moby+dick")]
    #[case(&[("query", "a/b?c=d")], "/opds/search?query=a%2Fb%3Fc%3Dd")]
    fn test_build_url(#[case] pairs: &[(&'static str, &str)], #[case] expected: &str) {
        let mut params = QueryParams::new();
        for &(key, value) in pairs {
            params.push(key, value);
        }
        assert_eq!(build_url("/opds/search", &params), expected);
    }

    #[test]
    fn test_get_returns_first() {
        let params = QueryParams::new().with("page", "1").with("page", "2");
        assert_eq!(params.get("page"), Some("1"));
        assert_eq!(params.get("limit"), None);
    }
}
