//! Turning raw request parameters into a validated query descriptor.
//!
//! Composition never fails: anything unparsable falls back to a default, so
//! every descriptor is valid by construction. The descriptor is the single
//! source for the engine query, the self and pagination links, and every
//! facet option.

use crate::href::{QueryParams, build_url};
use crate::params::RawParams;
use folio_config::MAX_PAGE_SIZE;
use folio_search::constants::{Crosswalk, OrderBy, SearchType, SortDirection};
use folio_search::{Format, Query, Rights, Scope};

/// Feed endpoints that list publications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Bookshelves,
    Classification,
    Subjects,
    Search,
}

impl Route {
    /// Path segment below the configured base path.
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Bookshelves => "bookshelves",
            Self::Classification => "loccs",
            Self::Subjects => "subjects",
            Self::Search => "search",
        }
    }

    /// Name of the request parameter carrying this route's scope.
    pub fn scope_param(&self) -> &'static str {
        match self {
            Self::Bookshelves | Self::Subjects => "id",
            Self::Classification => "parent",
            Self::Search => "locc",
        }
    }
}

/// One dimension of a descriptor to change, see [`QueryDescriptor::vary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variation {
    Page(u32),
    Sort(Option<OrderBy>, Option<SortDirection>),
    Rights(Rights),
    Format(Format),
    Language(Option<String>),
    Scope(Scope),
}

/// A validated, immutable description of one feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    route: Route,
    text: String,
    /// Raw `field` value, only set on the search route.
    field: Option<String>,
    mode: SearchType,
    scope: Scope,
    language: Option<String>,
    rights: Rights,
    format: Format,
    sort: Option<OrderBy>,
    direction: Option<SortDirection>,
    page: u32,
    page_size: u32,
}

const DEFAULT_FIELD: &str = "fuzzy";

impl QueryDescriptor {
    /// Validates raw parameters for a route.
    ///
    /// ```
    /// use folio_feed::{QueryDescriptor, RawParams, Route};
    /// use folio_search::Scope;
    ///
    /// let params = RawParams::from_query("parent=bf&page=-3&limit=500&sort=nonsense");
    /// let descriptor = QueryDescriptor::compose(Route::Classification, &params, 28);
    /// assert_eq!(descriptor.scope(), &Scope::Classification("BF".to_string()));
    /// assert_eq!((descriptor.page(), descriptor.page_size()), (1, 100));
    /// assert_eq!(descriptor.sort(), None);
    /// ```
    pub fn compose(route: Route, params: &RawParams, default_limit: u32) -> Self {
        let (page, page_size) = paginate(params.page.as_deref(), params.limit.as_deref(), default_limit);
        let field = match route {
            Route::Search => Some(non_empty(params.field.as_deref()).unwrap_or(DEFAULT_FIELD).to_string()),
            _ => None,
        };
        let mode = field.as_deref().map(SearchType::from_field).unwrap_or_default();
        Self {
            route,
            text: params.query.clone().unwrap_or_default(),
            field,
            mode,
            scope: scope(route, params),
            language: non_empty(params.lang.as_deref()).map(str::to_string),
            rights: match params.copyrighted.as_deref() {
                Some("true") => Rights::Copyrighted,
                Some("false") => Rights::PublicDomain,
                _ => Rights::Any,
            },
            format: match params.audiobook.as_deref() {
                Some("true") => Format::Audiobook,
                Some("false") => Format::Text,
                _ => Format::Any,
            },
            sort: params.sort.as_deref().and_then(|sort| sort.parse().ok()),
            direction: params.sort_order.as_deref().and_then(|order| order.parse().ok()),
            page,
            page_size,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Free text exactly as requested; may be blank.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn mode(&self) -> SearchType {
        self.mode
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn rights(&self) -> Rights {
        self.rights
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn sort(&self) -> Option<OrderBy> {
        self.sort
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The engine query for this request: scope, free text, filters, then
    /// ordering (downloads descending unless a valid sort was requested).
    pub fn to_query(&self, crosswalk: impl Into<Option<Crosswalk>>) -> Query {
        let query = self.filtered(Query::new(crosswalk));
        match self.sort {
            Some(sort) => query.order_by(sort, self.direction),
            None => query.order_by(OrderBy::Downloads, SortDirection::Desc),
        }
    }

    /// The same query without ordering or crosswalk, for subject
    /// aggregation over the results.
    pub fn to_subjects_query(&self) -> Query {
        self.filtered(Query::default())
    }

    fn filtered(&self, query: Query) -> Query {
        let mut query = query.scoped(&self.scope);
        if self.has_text() {
            query = query.search(self.text.trim(), self.mode);
        }
        if let Some(language) = &self.language {
            query = query.language(language.as_str());
        }
        query = match self.rights {
            Rights::Any => query,
            Rights::PublicDomain => query.public_domain_only(),
            Rights::Copyrighted => query.copyrighted_only(),
        };
        match self.format {
            Format::Any => query,
            Format::Text => query.text_only(),
            Format::Audiobook => query.audiobook_only(),
        }
    }

    /// A copy with one dimension changed and the page reset to 1 (unless
    /// the page itself is what changes).
    pub fn vary(&self, variation: Variation) -> Self {
        let mut next = self.clone();
        next.page = 1;
        match variation {
            Variation::Page(page) => next.page = page.max(1),
            Variation::Sort(sort, direction) => {
                next.sort = sort;
                next.direction = direction;
            },
            Variation::Rights(rights) => next.rights = rights,
            Variation::Format(format) => next.format = format,
            Variation::Language(language) => next.language = language.filter(|lang| !lang.is_empty()),
            Variation::Scope(scope) => next.scope = scope,
        }
        next
    }

    /// Request parameters reproducing this descriptor, in a fixed order.
    pub fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        let scope = match &self.scope {
            Scope::Unscoped => String::new(),
            Scope::Bookshelf(id) | Scope::Subject(id) => id.to_string(),
            Scope::Classification(code) => code.clone(),
        };
        params.push(self.route.scope_param(), scope).push("limit", self.page_size.to_string());
        if let Some(field) = &self.field {
            params.push("field", field.as_str());
        }
        params
            .push("lang", self.language.clone().unwrap_or_default())
            .push("copyrighted", match self.rights {
                Rights::Any => "",
                Rights::PublicDomain => "false",
                Rights::Copyrighted => "true",
            })
            .push("audiobook", match self.format {
                Format::Any => "",
                Format::Text => "false",
                Format::Audiobook => "true",
            })
            .push("sort", self.sort.map(|sort| sort.as_str()).unwrap_or_default())
            .push("sort_order", self.direction.map(|direction| direction.as_str()).unwrap_or_default())
            .push("query", self.text.as_str())
            .push("page", self.page.to_string());
        params
    }

    /// Link to this exact request under `base_path`.
    pub fn url(&self, base_path: &str) -> String {
        build_url(&format!("{base_path}/{}", self.route.segment()), &self.params())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// `(max(1, page), clamp(limit, 1, 100))`; both fall back to defaults if
/// either is unparsable.
fn paginate(page: Option<&str>, limit: Option<&str>, default_limit: u32) -> (u32, u32) {
    let parse = |value: Option<&str>| value.map_or(Ok(None), |value| value.trim().parse::<i64>().map(Some));
    match (parse(page), parse(limit)) {
        (Ok(page), Ok(limit)) => {
            let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
            let limit = limit.unwrap_or(i64::from(default_limit)).clamp(1, i64::from(MAX_PAGE_SIZE));
            (page as u32, limit as u32)
        },
        _ => (1, default_limit.clamp(1, MAX_PAGE_SIZE)),
    }
}

fn scope(route: Route, params: &RawParams) -> Scope {
    let id = |value: Option<&str>| non_empty(value).and_then(|id| id.parse::<u64>().ok());
    let code = |value: Option<&str>| non_empty(value).map(|code| Scope::Classification(code.to_uppercase()));
    let scope = match route {
        Route::Bookshelves => id(params.id.as_deref()).map(Scope::Bookshelf),
        Route::Subjects => id(params.id.as_deref()).map(Scope::Subject),
        Route::Classification => code(params.parent.as_deref()),
        Route::Search => code(params.locc.as_deref()),
    };
    scope.unwrap_or_default()
}
