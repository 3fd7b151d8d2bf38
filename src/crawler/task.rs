//! Crawl tasks and breadcrumb paths
//!
//! A [`CrawlTask`] is created by a walker when it discovers a link and is
//! consumed exactly once by the coordinator. Tasks own their
//! [`BrowsePath`]; branching copies the parent path so sibling subtrees never
//! share a breadcrumb.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Ordered category names from the root down to the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrowsePath(Vec<String>);

impl BrowsePath {
    /// The empty path of a root category page
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a copy of this path extended by one category name
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut names = Vec::with_capacity(self.0.len() + 1);
        names.extend(self.0.iter().cloned());
        names.push(name.into());
        Self(names)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The category names, root first
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// The top-level category this path descends from
    pub fn top_level(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for BrowsePath {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl fmt::Display for BrowsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

/// Which handler processes a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKind {
    /// A page believed to list subcategories; `root` enables allow-list filtering
    Category { root: bool },

    /// A leaf category page reached through a "next" link
    Pagination,

    /// An item detail page
    Item,
}

impl TaskKind {
    /// Short label used in logs, summaries and persisted failures
    pub fn label(&self) -> &'static str {
        match self {
            Self::Category { root: true } => "root",
            Self::Category { root: false } => "category",
            Self::Pagination => "pagination",
            Self::Item => "item",
        }
    }

    /// Parses a label produced by [`TaskKind::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "root" => Some(Self::Category { root: true }),
            "category" => Some(Self::Category { root: false }),
            "pagination" => Some(Self::Pagination),
            "item" => Some(Self::Item),
            _ => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A unit of crawl work: fetch `url`, then handle it according to `kind`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    kind: TaskKind,
    url: Url,
    path: BrowsePath,
}

impl CrawlTask {
    /// A root category task for a seed URL
    pub fn root(url: Url) -> Self {
        Self {
            kind: TaskKind::Category { root: true },
            url,
            path: BrowsePath::root(),
        }
    }

    /// A non-root category task
    pub fn category(url: Url, path: BrowsePath) -> Self {
        Self {
            kind: TaskKind::Category { root: false },
            url,
            path,
        }
    }

    /// A task continuing a paginated listing on its next page
    pub fn pagination(url: Url, path: BrowsePath) -> Self {
        Self {
            kind: TaskKind::Pagination,
            url,
            path,
        }
    }

    /// An item detail task
    pub fn item(url: Url, path: BrowsePath) -> Self {
        Self {
            kind: TaskKind::Item,
            url,
            path,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &BrowsePath {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_extends_by_one() {
        let parent = BrowsePath::root().child("In Sunsh");
        let child = parent.child("Dawn");

        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.names(), &["In Sunsh".to_string(), "Dawn".to_string()]);
        assert_eq!(child.top_level(), Some("In Sunsh"));
    }

    #[test]
    fn test_siblings_are_independent_copies() {
        let parent = BrowsePath::root().child("Summertime");
        let first = parent.child("Beach");
        let mut second = parent.child("Pool").into_vec();

        assert_eq!(first.names()[..1], second[..1]);
        assert_ne!(first.names()[1], second[1]);

        second.push("mutated".to_string());
        second[0] = "changed".to_string();

        assert_eq!(parent.names(), &["Summertime".to_string()]);
        assert_eq!(
            first.names(),
            &["Summertime".to_string(), "Beach".to_string()]
        );
    }

    #[test]
    fn test_display_and_serialize() {
        let path = BrowsePath::root().child("In Sunsh").child("Dawn");
        assert_eq!(path.to_string(), "In Sunsh > Dawn");
        assert_eq!(
            serde_json::to_string(&path).unwrap(),
            r#"["In Sunsh","Dawn"]"#
        );
    }

    #[test]
    fn test_task_constructors() {
        let url = Url::parse("http://example.com/browse/").unwrap();
        let root = CrawlTask::root(url.clone());
        assert_eq!(root.kind(), TaskKind::Category { root: true });
        assert!(root.path().is_empty());

        let item = CrawlTask::item(url, BrowsePath::root().child("A"));
        assert_eq!(item.kind(), TaskKind::Item);
        assert_eq!(item.kind().label(), "item");
        assert_eq!(item.path().len(), 1);
    }
}
