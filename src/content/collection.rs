//! Named, ordered sets of documents exposed to templates

use glob::{MatchOptions, Pattern, PatternError};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use super::Document;

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Invalid collection pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: PatternError,
    },
}

/// `*` and `?` stop at `/`, so `posts/*.md` only matches direct children
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// An ordered, immutable view over loaded documents
#[derive(Debug, Clone, Default)]
pub struct Collection {
    name: String,
    items: Vec<Arc<Document>>,
}

impl Collection {
    /// A collection holding `items` in the given order
    pub fn new(name: impl Into<String>, items: Vec<Arc<Document>>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Document>> + '_ {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Document>] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Arc<Document>;
    type IntoIter = std::slice::Iter<'a, Arc<Document>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter().map(|doc| &**doc))
    }
}

/// Newest first; undated documents after every dated one.
///
/// Used with a stable sort, so equal keys keep discovery order.
pub fn compare_by_date_desc(a: &Document, b: &Document) -> Ordering {
    match (&a.date, &b.date) {
        (Some(da), Some(db)) => db.cmp(da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Select the documents whose path matches `pattern` and order them by date,
/// newest first.
///
/// A path that appears more than once is kept at its first occurrence. An
/// empty match set is an empty collection.
pub fn build(
    name: &str,
    documents: &[Arc<Document>],
    pattern: &str,
) -> Result<Collection, CollectionError> {
    let matcher = Pattern::new(pattern).map_err(|source| CollectionError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut items: Vec<Arc<Document>> = documents
        .iter()
        .filter(|doc| matcher.matches_with(&doc.path, MATCH_OPTIONS))
        .filter(|doc| seen.insert(doc.path.clone()))
        .cloned()
        .collect();

    for doc in items.iter().filter(|doc| doc.date.is_none()) {
        tracing::warn!(
            "{} has no usable date; placing it at the end of `{}`",
            doc.path,
            name
        );
    }

    // slice::sort_by is stable
    items.sort_by(|a, b| compare_by_date_desc(a, b));

    tracing::debug!("Collection `{}`: {} documents", name, items.len());

    Ok(Collection::new(name, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SourceFormat;
    use crate::helpers::parse_date_str;

    fn doc(path: &str, date: Option<&str>) -> Arc<Document> {
        let mut doc = Document::new(path, SourceFormat::Markdown, "");
        doc.date = date.map(|d| parse_date_str(d).unwrap());
        Arc::new(doc)
    }

    fn paths(collection: &Collection) -> Vec<&str> {
        collection.iter().map(|d| d.path.as_str()).collect()
    }

    #[test]
    fn test_sorts_newest_first() {
        let docs = vec![
            doc("posts/jan.md", Some("2024-01-01")),
            doc("posts/mar.md", Some("2024-03-01")),
            doc("posts/feb.md", Some("2024-02-01")),
        ];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        assert_eq!(paths(&posts), vec!["posts/mar.md", "posts/feb.md", "posts/jan.md"]);
    }

    #[test]
    fn test_equal_dates_keep_discovery_order() {
        let docs = vec![
            doc("posts/first.md", Some("2024-05-05")),
            doc("posts/newer.md", Some("2024-06-01")),
            doc("posts/second.md", Some("2024-05-05")),
        ];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        assert_eq!(
            paths(&posts),
            vec!["posts/newer.md", "posts/first.md", "posts/second.md"]
        );
    }

    #[test]
    fn test_filters_by_pattern() {
        let docs = vec![
            doc("index.html", Some("2024-01-01")),
            doc("posts/a.md", Some("2024-01-02")),
            doc("posts/drafts/b.md", Some("2024-01-03")),
            doc("posts/c.html", Some("2024-01-04")),
        ];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        assert_eq!(paths(&posts), vec!["posts/a.md"]);
    }

    #[test]
    fn test_missing_dates_go_last_in_discovery_order() {
        let docs = vec![
            doc("posts/undated-1.md", None),
            doc("posts/old.md", Some("2020-01-01")),
            doc("posts/undated-2.md", None),
            doc("posts/new.md", Some("2024-01-01")),
        ];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        assert_eq!(
            paths(&posts),
            vec![
                "posts/new.md",
                "posts/old.md",
                "posts/undated-1.md",
                "posts/undated-2.md"
            ]
        );
    }

    #[test]
    fn test_no_matches_is_empty() {
        let docs = vec![doc("about.md", Some("2024-01-01"))];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        assert!(posts.is_empty());
        assert!(build("posts", &[], "posts/*.md").unwrap().is_empty());
    }

    #[test]
    fn test_duplicates_removed() {
        let a = doc("posts/a.md", Some("2024-01-01"));
        let docs = vec![a.clone(), doc("posts/b.md", Some("2024-02-01")), a];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        assert_eq!(paths(&posts), vec!["posts/b.md", "posts/a.md"]);
    }

    #[test]
    fn test_input_untouched_and_iteration_restartable() {
        let docs = vec![
            doc("posts/a.md", Some("2024-01-01")),
            doc("posts/b.md", Some("2024-02-01")),
        ];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        assert_eq!(docs[0].path, "posts/a.md");
        assert_eq!(paths(&posts), paths(&posts));
        assert!(Arc::ptr_eq(&posts.as_slice()[1], &docs[0]));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = build("posts", &[], "posts/[.md").unwrap_err();
        assert!(err.to_string().contains("posts/[.md"));
    }

    #[test]
    fn test_serializes_as_sequence() {
        let docs = vec![doc("posts/a.md", Some("2024-01-01"))];
        let posts = build("posts", &docs, "posts/*.md").unwrap();
        let value = serde_json::to_value(&posts).unwrap();
        assert_eq!(value[0]["path"], "posts/a.md");
    }
}
