//! Immutable navigation cache snapshots.

use folio_search::{ClassificationNode, FeedResult, Subject};
use std::collections::HashMap;
use time::{Duration, UtcDateTime};

/// Identifies one cached navigation aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Random sample of a curated bookshelf.
    BookshelfSample(u64),
    /// Children of a classification node.
    ClassificationChildren(String),
    /// Book count of a leaf classification node.
    ClassificationCount(String),
    /// Every subject, ranked by book count.
    Subjects,
}

/// A random sample of a bookshelf together with the shelf's total size.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub result: FeedResult,
    pub count: u64,
}
impl From<FeedResult> for Sample {
    fn from(result: FeedResult) -> Self {
        Self { count: result.total, result }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Sample(Sample),
    Children(Vec<ClassificationNode>),
    LeafCount(u64),
    /// Sorted by `book_count`, descending.
    Subjects(Vec<Subject>),
}

/// One complete version of the navigation cache.
///
/// Snapshots are immutable once published: a rebuild produces a brand-new
/// snapshot and swaps it in whole. Holding an `Arc<Snapshot>` therefore
/// guarantees every lookup made through it comes from the same rebuild.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: HashMap<CacheKey, CachedValue>,
    /// `None` for the initial empty snapshot and injected ones.
    built_at: Option<UtcDateTime>,
    /// Number of the rebuild that produced this snapshot; 0 before the first.
    generation: u64,
}

impl Snapshot {
    pub(crate) fn built(entries: HashMap<CacheKey, CachedValue>, generation: u64) -> Self {
        Self {
            entries,
            built_at: Some(UtcDateTime::now()),
            generation,
        }
    }

    /// A fixed snapshot, e.g. for injecting known navigation data in tests.
    ///
    /// ```
    /// use folio_cache::{CacheKey, CachedValue, Snapshot};
    ///
    /// let snapshot = Snapshot::from_entries([(CacheKey::ClassificationCount("BF".into()), CachedValue::LeafCount(7))]);
    /// assert_eq!(snapshot.leaf_count("BF"), Some(7));
    /// assert_eq!(snapshot.leaf_count("BX"), None);
    /// ```
    pub fn from_entries(entries: impl IntoIterator<Item = (CacheKey, CachedValue)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A copy of this snapshot with one more entry (replacing any existing
    /// entry for the key).
    pub(crate) fn with(&self, key: CacheKey, value: CachedValue) -> Self {
        let mut next = self.clone();
        next.entries.insert(key, value);
        next
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CachedValue> {
        self.entries.get(key)
    }

    pub fn sample(&self, shelf_id: u64) -> Option<&Sample> {
        match self.get(&CacheKey::BookshelfSample(shelf_id))? {
            CachedValue::Sample(sample) => Some(sample),
            _ => None,
        }
    }

    pub fn children(&self, code: &str) -> Option<&[ClassificationNode]> {
        match self.get(&CacheKey::ClassificationChildren(code.to_string()))? {
            CachedValue::Children(children) => Some(children),
            _ => None,
        }
    }

    pub fn leaf_count(&self, code: &str) -> Option<u64> {
        match self.get(&CacheKey::ClassificationCount(code.to_string()))? {
            CachedValue::LeafCount(count) => Some(*count),
            _ => None,
        }
    }

    pub fn subjects(&self) -> Option<&[Subject]> {
        match self.get(&CacheKey::Subjects)? {
            CachedValue::Subjects(subjects) => Some(subjects),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn built_at(&self) -> Option<UtcDateTime> {
        self.built_at
    }

    /// Time since the rebuild this snapshot comes from, if any.
    ///
    /// Entries written back after that rebuild do not reset the age.
    pub fn age(&self) -> Option<Duration> {
        self.built_at.map(|built| UtcDateTime::now() - built)
    }
}
