use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An opaque publication record, as shaped by the engine's crosswalk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Publication(serde_json::Value);
impl Publication {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}
impl From<serde_json::Value> for Publication {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedResult {
    /// Total number of matching publications across all pages.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub results: Vec<Publication>,
}
impl FeedResult {
    /// Builds a page of results, deriving `total_pages` as
    /// `ceil(total / page_size)`.
    ///
    /// ```
    /// use folio_search::FeedResult;
    /// assert_eq!(FeedResult::new(25, 2, 10, vec![]).total_pages, 3);
    /// assert_eq!(FeedResult::new(20, 1, 10, vec![]).total_pages, 2);
    /// assert_eq!(FeedResult::new(0, 1, 10, vec![]).total_pages, 0);
    /// ```
    pub fn new(total: u64, page: u32, page_size: u32, results: Vec<Publication>) -> Self {
        let pages = total.div_ceil(u64::from(page_size.max(1)));
        Self {
            total,
            page,
            page_size,
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
            results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A node of the classification tree.
///
/// The tree is never materialised: children are fetched on demand from the
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassificationNode {
    /// Canonical upper-case code (e.g. `"BF"`).
    pub code: String,
    pub label: String,
    pub has_children: bool,
}
impl ClassificationNode {
    pub fn new(code: impl AsRef<str>, label: impl Into<String>, has_children: bool) -> Self {
        Self {
            code: code.as_ref().trim().to_uppercase(),
            label: label.into(),
            has_children,
        }
    }

    /// Label with any leading `"CODE:"` qualifier removed.
    ///
    /// ```
    /// use folio_search::ClassificationNode;
    /// let node = ClassificationNode::new("BF", "BF: Psychology", false);
    /// assert_eq!(node.display_label(), "Psychology");
    /// let node = ClassificationNode::new("B", "Philosophy", true);
    /// assert_eq!(node.display_label(), "Philosophy");
    /// ```
    pub fn display_label(&self) -> &str {
        match self.label.split_once(':') {
            Some((_, rest)) => rest.trim(),
            None => &self.label,
        }
    }

    /// Broader categories (shorter codes) first, ties broken lexicographically.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.code.len().cmp(&other.code.len()).then_with(|| self.code.cmp(&other.code))
    }

    /// Sorts sibling nodes into canonical display order.
    pub fn sort(nodes: &mut [ClassificationNode]) {
        nodes.sort_by(Self::canonical_cmp);
    }
}

/// A subject heading with the number of publications filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject {
    pub id: u64,
    pub name: String,
    pub book_count: u64,
}
impl Subject {
    /// Sorts subjects by `book_count`, most populated first. Stable, so equal
    /// counts keep the engine's order.
    pub fn rank(subjects: &mut [Subject]) {
        subjects.sort_by(|a, b| b.book_count.cmp(&a.book_count));
    }
}

/// A subject's frequency within one query's matching documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopSubject {
    pub id: u64,
    pub name: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_canonical_order() {
        let mut nodes = vec![
            ClassificationNode::new("BX", "Christian Denominations", false),
            ClassificationNode::new("BF", "Psychology", false),
            ClassificationNode::new("B", "Philosophy (General)", false),
            ClassificationNode::new("BJ", "Ethics", false),
        ];
        ClassificationNode::sort(&mut nodes);
        let codes: Vec<_> = nodes.iter().map(|n| n.code.as_str()).collect();
        assert_eq!(codes, ["B", "BF", "BJ", "BX"]);
    }

    #[rstest]
    #[case(" qa ", "QA")]
    #[case("Pr", "PR")]
    fn test_code_is_canonical(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ClassificationNode::new(input, "", false).code, expected);
    }

    #[test]
    fn test_subject_rank_is_stable() {
        let mut subjects = vec![
            Subject { id: 1, name: "Fiction".into(), book_count: 10 },
            Subject { id: 2, name: "Poetry".into(), book_count: 40 },
            Subject { id: 3, name: "Drama".into(), book_count: 10 },
        ];
        Subject::rank(&mut subjects);
        let ids: Vec<_> = subjects.iter().map(|s| s.id).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 10, 3)]
    fn test_total_pages(#[case] total: u64, #[case] size: u32, #[case] expected: u32) {
        assert_eq!(FeedResult::new(total, 1, size, vec![]).total_pages, expected);
    }
}
