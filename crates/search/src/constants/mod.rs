//! Enumerated values shared between the search engine and its consumers.
//!
//! Static catalog data (curated bookshelves, offered languages, top-level
//! classification classes) lives in the submodules; it is configuration
//! compiled into the binary and never mutated at runtime.

mod bookshelves;
mod lang;
mod locc;

pub use self::bookshelves::{BookshelfCategory, CURATED_BOOKSHELVES, Shelf};
pub use self::lang::{LANGUAGES, Language};
pub use self::locc::{MAIN_CLASSES, MainClass};
use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Fields a query may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderBy {
    /// Download count; the catalog's notion of popularity.
    Downloads,
    Relevance,
    Title,
    Author,
    Random,
    ReleaseDate,
}
impl OrderBy {
    pub const ALL: [OrderBy; 6] = [
        Self::Downloads,
        Self::Relevance,
        Self::Title,
        Self::Author,
        Self::Random,
        Self::ReleaseDate,
    ];

    /// Returns the request parameter value for the sort field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downloads => "downloads",
            Self::Relevance => "relevance",
            Self::Title => "title",
            Self::Author => "author",
            Self::Random => "random",
            Self::ReleaseDate => "release_date",
        }
    }
}
impl FromStr for OrderBy {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| exn::Exn::from(ErrorKind::InvalidQuery(format!("unknown sort field: {s}"))))
    }
}
impl Display for OrderBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}
impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}
impl FromStr for SortDirection {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "asc" => Self::Asc,
            "desc" => Self::Desc,
            _ => exn::bail!(ErrorKind::InvalidQuery(format!("unknown sort direction: {s}"))),
        })
    }
}

/// How free text is matched against the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Typo-tolerant matching on titles and authors.
    #[default]
    Fuzzy,
    /// Full-text search with the engine's query syntax.
    FullText,
}
impl SearchType {
    /// Field values starting with this marker select full-text search.
    pub const FULL_TEXT_MARKER: &'static str = "fts";

    /// Classifies a request `field` value.
    ///
    /// ```
    /// use folio_search::constants::SearchType;
    /// assert_eq!(SearchType::from_field("fts"), SearchType::FullText);
    /// assert_eq!(SearchType::from_field("fts_title"), SearchType::FullText);
    /// assert_eq!(SearchType::from_field("fuzzy"), SearchType::Fuzzy);
    /// assert_eq!(SearchType::from_field(""), SearchType::Fuzzy);
    /// ```
    pub fn from_field(field: &str) -> Self {
        if field.starts_with(Self::FULL_TEXT_MARKER) {
            Self::FullText
        } else {
            Self::Fuzzy
        }
    }
}

/// Output shaping mode controlling which publication fields the engine
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crosswalk {
    /// Full OPDS 2.0 publication records.
    Opds,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("downloads", OrderBy::Downloads)]
    #[case("relevance", OrderBy::Relevance)]
    #[case("title", OrderBy::Title)]
    #[case("author", OrderBy::Author)]
    #[case("random", OrderBy::Random)]
    #[case("release_date", OrderBy::ReleaseDate)]
    fn test_order_by_parse(#[case] input: &str, #[case] expected: OrderBy) {
        assert_eq!(input.parse::<OrderBy>().unwrap(), expected);
        assert_eq!(expected.as_str(), input);
    }

    #[rstest]
    #[case("")]
    #[case("Downloads")]
    #[case("popularity")]
    fn test_order_by_rejects_unknown(#[case] input: &str) {
        let err = input.parse::<OrderBy>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidQuery(_)));
    }

    #[rstest]
    #[case("asc", Some(SortDirection::Asc))]
    #[case("desc", Some(SortDirection::Desc))]
    #[case("DESC", None)]
    #[case("", None)]
    fn test_sort_direction_parse(#[case] input: &str, #[case] expected: Option<SortDirection>) {
        assert_eq!(input.parse::<SortDirection>().ok(), expected);
    }
}
