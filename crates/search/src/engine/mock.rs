//! In-memory search engine for testing.

use crate::SearchEngine;
use crate::constants::{OrderBy, SortDirection};
use crate::error::{ErrorKind, Result};
use crate::models::{ClassificationNode, FeedResult, Publication, Subject, TopSubject};
use crate::query::{Format, Query, Rights, Scope};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

/// A fixture publication known to the [`MockEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockBook {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub language: String,
    pub copyrighted: bool,
    pub audiobook: bool,
    pub downloads: u64,
    pub bookshelves: Vec<u64>,
    pub classifications: Vec<String>,
    pub subjects: Vec<u64>,
}
impl MockBook {
    /// A public domain, English, text publication with no shelves,
    /// classifications or subjects.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: "Anonymous".to_string(),
            language: "en".to_string(),
            copyrighted: false,
            audiobook: false,
            downloads: 0,
            bookshelves: Vec::new(),
            classifications: Vec::new(),
            subjects: Vec::new(),
        }
    }

    pub fn by(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn in_language(mut self, code: impl Into<String>) -> Self {
        self.language = code.into();
        self
    }

    pub fn copyrighted(mut self) -> Self {
        self.copyrighted = true;
        self
    }

    pub fn audiobook(mut self) -> Self {
        self.audiobook = true;
        self
    }

    pub fn downloads(mut self, downloads: u64) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn on_shelf(mut self, shelf: u64) -> Self {
        self.bookshelves.push(shelf);
        self
    }

    pub fn classified(mut self, code: impl AsRef<str>) -> Self {
        self.classifications.push(code.as_ref().to_uppercase());
        self
    }

    pub fn about(mut self, subject: u64) -> Self {
        self.subjects.push(subject);
        self
    }

    fn matches(&self, query: &Query) -> bool {
        let in_scope = match query.scope() {
            Scope::Unscoped => true,
            Scope::Bookshelf(id) => self.bookshelves.contains(id),
            Scope::Classification(code) => self.classifications.iter().any(|c| c.starts_with(code.as_str())),
            Scope::Subject(id) => self.subjects.contains(id),
        };
        let text = match query.text() {
            None => true,
            Some((text, _)) => {
                let needle = text.trim().to_lowercase();
                self.title.to_lowercase().contains(&needle) || self.author.to_lowercase().contains(&needle)
            },
        };
        let language = query.language_filter().is_none_or(|code| code == self.language);
        let rights = match query.rights() {
            Rights::Any => true,
            Rights::PublicDomain => !self.copyrighted,
            Rights::Copyrighted => self.copyrighted,
        };
        let format = match query.format() {
            Format::Any => true,
            Format::Text => !self.audiobook,
            Format::Audiobook => self.audiobook,
        };
        in_scope && text && language && rights && format
    }

    fn publication(&self, query: &Query) -> Publication {
        let record = match query.crosswalk() {
            Some(_) => serde_json::json!({
                "metadata": {
                    "@type": "http://schema.org/Book",
                    "identifier": format!("urn:gutenberg:{}", self.id),
                    "title": self.title,
                    "author": self.author,
                    "language": self.language,
                },
            }),
            None => serde_json::json!({ "id": self.id, "title": self.title }),
        };
        Publication::new(record)
    }
}

/// A recorded call to the [`MockEngine`], for asserting cache behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute(Query),
    Count(Query),
    Children(String),
    ListSubjects,
    SubjectName(u64),
    TopSubjects(Query),
}

/// An injected failure, making the matching operations return
/// [`ErrorKind::Backend`] ([`ErrorKind::Unavailable`] for
/// [`Failure::Unavailable`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Failure {
    /// Every `execute` and `count`.
    Execute,
    /// `execute`/`count` for queries scoped to this bookshelf.
    Bookshelf(u64),
    /// `classification_children` for this code (`""` for the top level).
    Children(String),
    /// `execute`/`count` for queries scoped to this classification code.
    Classification(String),
    Subjects,
    TopSubjects,
    /// Every operation, as if the engine could not be reached.
    Unavailable,
}

#[derive(Default)]
struct State {
    books: Vec<MockBook>,
    /// Insertion-ordered `(code, label)` pairs.
    classes: Vec<(String, String)>,
    subjects: BTreeMap<u64, String>,
    failures: HashSet<Failure>,
    calls: Vec<Call>,
}
impl State {
    fn fail_if(&self, failure: Failure) -> Result<()> {
        if self.failures.contains(&Failure::Unavailable) {
            exn::bail!(ErrorKind::Unavailable);
        }
        if self.failures.contains(&failure) {
            exn::bail!(ErrorKind::Backend(format!("injected failure: {failure:?}")));
        }
        Ok(())
    }

    fn check_query(&self, query: &Query) -> Result<()> {
        self.fail_if(Failure::Execute)?;
        match query.scope() {
            Scope::Bookshelf(id) => self.fail_if(Failure::Bookshelf(*id)),
            Scope::Classification(code) => self.fail_if(Failure::Classification(code.clone())),
            _ => Ok(()),
        }
    }

    fn matching(&self, query: &Query) -> Vec<&MockBook> {
        let mut books: Vec<_> = self.books.iter().filter(|book| book.matches(query)).collect();
        let (order, direction) = query.ordering().unwrap_or((OrderBy::Downloads, Some(SortDirection::Desc)));
        match order {
            OrderBy::Downloads => books.sort_by(|a, b| b.downloads.cmp(&a.downloads).then(a.id.cmp(&b.id))),
            OrderBy::Title => books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id))),
            OrderBy::Author => books.sort_by(|a, b| a.author.cmp(&b.author).then(a.id.cmp(&b.id))),
            OrderBy::ReleaseDate => books.sort_by(|a, b| b.id.cmp(&a.id)),
            // Deterministic stand-ins: fixtures are returned in id order.
            OrderBy::Relevance | OrderBy::Random => books.sort_by_key(|book| book.id),
        }
        let natural = match order {
            OrderBy::Downloads | OrderBy::ReleaseDate => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        if direction.is_some_and(|d| d != natural) {
            books.reverse();
        }
        books
    }

    /// The longest registered code that is a strict prefix of `code`.
    fn parent_of(&self, code: &str) -> String {
        self.classes
            .iter()
            .map(|(c, _)| c.as_str())
            .filter(|c| c.len() < code.len() && code.starts_with(c))
            .max_by_key(|c| c.len())
            .unwrap_or_default()
            .to_string()
    }
}

/// In-memory search engine for testing.
///
/// Holds a fixture corpus of [`MockBook`]s, a classification tree and a
/// subject list behind a [`RwLock`], and implements real filtering, ordering
/// and paging over them so that feeds built on top of it are meaningful.
/// Every call is recorded (see [`calls`](Self::calls)) and failures can be
/// injected per operation (see [`fail`](Self::fail)).
///
/// # Examples
///
/// ```
/// use folio_search::{MockBook, MockEngine, Query, SearchEngine};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let engine = MockEngine::default()
///     .with_books([MockBook::new(1, "Walden").classified("PS"), MockBook::new(2, "Emma").classified("PR")])
///     .with_classes([("P", "Language and Literature"), ("PR", "English literature"), ("PS", "American literature")]);
///
/// let result = engine.execute(&Query::default().classification_code("PS"), 1, 10).await.unwrap();
/// assert_eq!(result.total, 1);
/// let children = engine.classification_children("P").await.unwrap();
/// assert_eq!(children.len(), 2);
/// # }
/// ```
#[derive(Default)]
pub struct MockEngine {
    state: RwLock<State>,
}

impl MockEngine {
    /// Adds fixture publications.
    pub fn with_books(self, books: impl IntoIterator<Item = MockBook>) -> Self {
        let mut state = self.state.into_inner();
        state.books.extend(books);
        Self { state: RwLock::new(state) }
    }

    /// Adds classification nodes as `(code, label)`. A node's parent is the
    /// longest other registered code that prefixes it; nodes without one are
    /// top-level. Children are returned in registration order.
    pub fn with_classes(self, classes: impl IntoIterator<Item = (impl AsRef<str>, impl Into<String>)>) -> Self {
        let mut state = self.state.into_inner();
        state.classes.extend(classes.into_iter().map(|(code, label)| (code.as_ref().to_uppercase(), label.into())));
        Self { state: RwLock::new(state) }
    }

    /// Adds subject headings as `(id, name)`. Book counts are derived from
    /// the fixture publications.
    pub fn with_subjects(self, subjects: impl IntoIterator<Item = (u64, impl Into<String>)>) -> Self {
        let mut state = self.state.into_inner();
        state.subjects.extend(subjects.into_iter().map(|(id, name)| (id, name.into())));
        Self { state: RwLock::new(state) }
    }

    pub fn with_failure(self, failure: Failure) -> Self {
        let mut state = self.state.into_inner();
        state.failures.insert(failure);
        Self { state: RwLock::new(state) }
    }

    /// Starts failing the matching operations.
    pub async fn fail(&self, failure: Failure) {
        self.state.write().await.failures.insert(failure);
    }

    /// Stops failing the matching operations.
    pub async fn recover(&self, failure: &Failure) {
        self.state.write().await.failures.remove(failure);
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<Call> {
        self.state.read().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }
}

#[async_trait]
impl SearchEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, query: &Query, page: u32, page_size: u32) -> Result<FeedResult> {
        let mut state = self.state.write().await;
        state.calls.push(Call::Execute(query.clone()));
        state.check_query(query)?;
        let books = state.matching(query);
        let skip = (page.max(1) as usize - 1) * page_size as usize;
        let results = books.iter().skip(skip).take(page_size as usize).map(|book| book.publication(query)).collect();
        Ok(FeedResult::new(books.len() as u64, page, page_size, results))
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        let mut state = self.state.write().await;
        state.calls.push(Call::Count(query.clone()));
        state.check_query(query)?;
        Ok(state.books.iter().filter(|book| book.matches(query)).count() as u64)
    }

    async fn classification_children(&self, code: &str) -> Result<Vec<ClassificationNode>> {
        let code = code.trim().to_uppercase();
        let mut state = self.state.write().await;
        state.calls.push(Call::Children(code.clone()));
        state.fail_if(Failure::Children(code.clone()))?;
        let children = state
            .classes
            .iter()
            .filter(|(c, _)| state.parent_of(c) == code && *c != code)
            .map(|(c, label)| {
                let has_children = state.classes.iter().any(|(other, _)| other != c && state.parent_of(other) == *c);
                ClassificationNode::new(c, label.clone(), has_children)
            })
            .collect();
        Ok(children)
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let mut state = self.state.write().await;
        state.calls.push(Call::ListSubjects);
        state.fail_if(Failure::Subjects)?;
        let subjects = state
            .subjects
            .iter()
            .map(|(id, name)| Subject {
                id: *id,
                name: name.clone(),
                book_count: state.books.iter().filter(|book| book.subjects.contains(id)).count() as u64,
            })
            .collect();
        Ok(subjects)
    }

    async fn subject_name(&self, id: u64) -> Result<Option<String>> {
        let mut state = self.state.write().await;
        state.calls.push(Call::SubjectName(id));
        state.fail_if(Failure::Subjects)?;
        Ok(state.subjects.get(&id).cloned())
    }

    async fn top_subjects_for_query(&self, query: &Query, limit: usize, max_docs: usize) -> Result<Vec<TopSubject>> {
        let mut state = self.state.write().await;
        state.calls.push(Call::TopSubjects(query.clone()));
        state.fail_if(Failure::TopSubjects)?;
        let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
        for book in state.books.iter().filter(|book| book.matches(query)).take(max_docs) {
            for subject in &book.subjects {
                *counts.entry(*subject).or_default() += 1;
            }
        }
        let mut top: Vec<_> = counts
            .into_iter()
            .filter_map(|(id, count)| state.subjects.get(&id).map(|name| TopSubject { id, name: name.clone(), count }))
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count).then(a.id.cmp(&b.id)));
        top.truncate(limit);
        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{Crosswalk, SearchType};

    fn corpus() -> MockEngine {
        MockEngine::default()
            .with_books([
                MockBook::new(1, "Meditations").by("Marcus Aurelius").classified("B").downloads(50).about(10),
                MockBook::new(2, "Beyond Good and Evil").by("Nietzsche").classified("B").downloads(80).about(10),
                MockBook::new(3, "Dream Psychology").by("Freud").classified("BF").downloads(30).copyrighted().about(11),
                MockBook::new(4, "Walden").by("Thoreau").classified("PS").in_language("fr").audiobook().on_shelf(644),
            ])
            .with_classes([("B", "Philosophy"), ("BF", "BF: Psychology"), ("P", "Literature"), ("PS", "American")])
            .with_subjects([(10, "Philosophy"), (11, "Dreams"), (12, "Unused")])
    }

    #[tokio::test]
    async fn test_classification_prefix_scope() {
        let engine = corpus();
        let result = engine.execute(&Query::default().classification_code("B"), 1, 10).await.unwrap();
        assert_eq!(result.total, 3);
        let result = engine.execute(&Query::default().classification_code("BF"), 1, 10).await.unwrap();
        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn test_filters() {
        let engine = corpus();
        let query = Query::default().classification_code("B").public_domain_only();
        assert_eq!(engine.count(&query).await.unwrap(), 2);
        let query = Query::default().language("fr").audiobook_only();
        assert_eq!(engine.count(&query).await.unwrap(), 1);
        let query = Query::default().search("nietz", SearchType::Fuzzy);
        assert_eq!(engine.count(&query).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_default_order_is_downloads_desc() {
        let engine = corpus();
        let result = engine.execute(&Query::new(None).classification_code("B"), 1, 10).await.unwrap();
        let ids: Vec<_> = result.results.iter().map(|p| p.as_json()["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[tokio::test]
    async fn test_paging() {
        let engine = corpus();
        let result = engine.execute(&Query::new(Crosswalk::Opds), 2, 3).await.unwrap();
        assert_eq!(result.total, 4);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.results.len(), 1);
    }

    #[tokio::test]
    async fn test_classification_children() {
        let engine = corpus();
        let top = engine.classification_children("").await.unwrap();
        assert_eq!(
            top,
            [ClassificationNode::new("B", "Philosophy", true), ClassificationNode::new("P", "Literature", true)]
        );
        let children = engine.classification_children("b").await.unwrap();
        assert_eq!(children, [ClassificationNode::new("BF", "BF: Psychology", false)]);
        assert!(engine.classification_children("BF").await.unwrap().is_empty());
        assert!(engine.classification_children("ZZ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subjects() {
        let engine = corpus();
        let subjects = engine.list_subjects().await.unwrap();
        let counts: Vec<_> = subjects.iter().map(|s| (s.id, s.book_count)).collect();
        assert_eq!(counts, [(10, 2), (11, 1), (12, 0)]);
        assert_eq!(engine.subject_name(11).await.unwrap().as_deref(), Some("Dreams"));
        assert_eq!(engine.subject_name(99).await.unwrap(), None);

        let top = engine.top_subjects_for_query(&Query::default().classification_code("B"), 1, 500).await.unwrap();
        assert_eq!(top, [TopSubject { id: 10, name: "Philosophy".into(), count: 2 }]);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let engine = corpus().with_failure(Failure::Bookshelf(644));
        let err = engine.execute(&Query::default().bookshelf_id(644), 1, 10).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Backend(_)));
        assert!(engine.execute(&Query::default().bookshelf_id(645), 1, 10).await.is_ok());

        engine.recover(&Failure::Bookshelf(644)).await;
        assert!(engine.execute(&Query::default().bookshelf_id(644), 1, 10).await.is_ok());

        engine.fail(Failure::Children(String::new())).await;
        assert!(engine.classification_children("").await.is_err());
        assert!(engine.classification_children("B").await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable_fails_everything() {
        let engine = corpus().with_failure(Failure::Unavailable);
        let err = engine.execute(&Query::default(), 1, 10).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Unavailable);
        assert!(err.is_retryable());
        assert!(engine.classification_children("").await.is_err());
        assert!(engine.list_subjects().await.is_err());

        engine.recover(&Failure::Unavailable).await;
        assert!(engine.list_subjects().await.is_ok());
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let engine = corpus();
        engine.classification_children("B").await.unwrap();
        engine.list_subjects().await.unwrap();
        assert_eq!(engine.calls().await, [Call::Children("B".to_string()), Call::ListSubjects]);
        engine.clear_calls().await;
        assert!(engine.calls().await.is_empty());
    }
}
