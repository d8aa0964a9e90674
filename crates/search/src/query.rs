//! Engine-agnostic query description.
//!
//! A [`Query`] is built with chainable setters and handed to a
//! [`SearchEngine`](crate::SearchEngine) together with the page to fetch. It
//! only *describes* the search; translating it into the engine's own query
//! language is the engine implementation's job.

use crate::constants::{Crosswalk, OrderBy, SearchType, SortDirection};

/// The single hierarchy branch a query is narrowed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    #[default]
    Unscoped,
    Bookshelf(u64),
    /// Classification code, canonical upper-case.
    Classification(String),
    Subject(u64),
}

/// Copyright status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rights {
    #[default]
    Any,
    PublicDomain,
    Copyrighted,
}

/// Publication format filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    #[default]
    Any,
    Text,
    Audiobook,
}

/// Ordering applied to a query: a field and an optional direction. Without a
/// direction the engine's default for that field applies.
pub type Ordering = (OrderBy, Option<SortDirection>);

/// A search query under construction.
///
/// # Examples
///
/// ```
/// use folio_search::Query;
/// use folio_search::constants::{Crosswalk, OrderBy, SearchType, SortDirection};
///
/// let query = Query::new(Crosswalk::Opds)
///     .classification_code("b")
///     .search("ethics", SearchType::Fuzzy)
///     .language("en")
///     .public_domain_only()
///     .order_by(OrderBy::Title, SortDirection::Asc);
/// assert_eq!(query.scope(), &folio_search::Scope::Classification("B".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    crosswalk: Option<Crosswalk>,
    scope: Scope,
    search: Option<(String, SearchType)>,
    language: Option<String>,
    rights: Rights,
    format: Format,
    order: Option<Ordering>,
}

impl Query {
    pub fn new(crosswalk: impl Into<Option<Crosswalk>>) -> Self {
        Self {
            crosswalk: crosswalk.into(),
            ..Self::default()
        }
    }

    // =========================================================================
    // Scope
    // =========================================================================

    pub fn bookshelf_id(mut self, id: u64) -> Self {
        self.scope = Scope::Bookshelf(id);
        self
    }

    /// Codes are canonicalised to upper-case.
    pub fn classification_code(mut self, code: impl AsRef<str>) -> Self {
        self.scope = Scope::Classification(code.as_ref().trim().to_uppercase());
        self
    }

    pub fn subject_id(mut self, id: u64) -> Self {
        self.scope = Scope::Subject(id);
        self
    }

    /// Applies any [`Scope`] at once; equivalent to calling the matching
    /// setter (or nothing, for [`Scope::Unscoped`]).
    pub fn scoped(self, scope: &Scope) -> Self {
        match scope {
            Scope::Unscoped => self,
            Scope::Bookshelf(id) => self.bookshelf_id(*id),
            Scope::Classification(code) => self.classification_code(code),
            Scope::Subject(id) => self.subject_id(*id),
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    pub fn public_domain_only(mut self) -> Self {
        self.rights = Rights::PublicDomain;
        self
    }

    pub fn copyrighted_only(mut self) -> Self {
        self.rights = Rights::Copyrighted;
        self
    }

    pub fn audiobook_only(mut self) -> Self {
        self.format = Format::Audiobook;
        self
    }

    pub fn text_only(mut self) -> Self {
        self.format = Format::Text;
        self
    }

    // =========================================================================
    // Search & Sort
    // =========================================================================

    pub fn search(mut self, text: impl Into<String>, mode: SearchType) -> Self {
        self.search = Some((text.into(), mode));
        self
    }

    pub fn order_by(mut self, field: OrderBy, direction: impl Into<Option<SortDirection>>) -> Self {
        self.order = Some((field, direction.into()));
        self
    }

    // =========================================================================
    // Accessors (for engine implementations)
    // =========================================================================

    pub fn crosswalk(&self) -> Option<Crosswalk> {
        self.crosswalk
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn text(&self) -> Option<(&str, SearchType)> {
        self.search.as_ref().map(|(text, mode)| (text.as_str(), *mode))
    }

    pub fn language_filter(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn rights(&self) -> Rights {
        self.rights
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn ordering(&self) -> Option<Ordering> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_filter_replaces_earlier_in_same_dimension() {
        let query = Query::default().public_domain_only().copyrighted_only().text_only().audiobook_only();
        assert_eq!(query.rights(), Rights::Copyrighted);
        assert_eq!(query.format(), Format::Audiobook);
    }

    #[test]
    fn test_dimensions_are_independent() {
        let query = Query::default().language("de").public_domain_only().text_only();
        assert_eq!(query.language_filter(), Some("de"));
        assert_eq!(query.rights(), Rights::PublicDomain);
        assert_eq!(query.format(), Format::Text);
        assert_eq!(query.scope(), &Scope::Unscoped);
        assert_eq!(query.ordering(), None);
    }

    #[test]
    fn test_scoped_matches_individual_setters() {
        let scope = Scope::Classification("qa".to_string());
        assert_eq!(Query::default().scoped(&scope), Query::default().classification_code("QA"));
        assert_eq!(Query::default().scoped(&Scope::Bookshelf(644)), Query::default().bookshelf_id(644));
        assert_eq!(Query::default().scoped(&Scope::Unscoped), Query::default());
    }
}
