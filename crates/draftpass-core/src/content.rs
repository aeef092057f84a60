//! Content items and the two read-only collaborators the pipeline queries:
//! the content store and the preview registration set.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Content type of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Page,
    Attachment,
    /// Any other registered type, by name.
    #[serde(untagged)]
    Custom(String),
}

impl ContentKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Attachment => "attachment",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Pending,
    Future,
    Private,
    Publish,
}

impl ContentStatus {
    /// Statuses that are served through the ordinary path.
    pub fn is_published(self) -> bool {
        matches!(self, Self::Publish)
    }
}

/// One addressable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    pub kind: ContentKind,
    #[serde(default)]
    pub slug: String,
    pub status: ContentStatus,
    #[serde(default)]
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub body: String,
}

impl ContentItem {
    /// The slug, or the numeric id when the slug is empty.
    pub fn slug_or_id(&self) -> String {
        if self.slug.trim().is_empty() {
            self.id.to_string()
        } else {
            self.slug.clone()
        }
    }
}

/// Looks up content by id.
pub trait ContentStore: Send + Sync {
    fn load_by_id(&self, id: u64) -> Option<ContentItem>;
}

/// The externally owned set of ids opted into public preview.
pub trait Registry: Send + Sync {
    fn is_enabled(&self, id: u64) -> bool;
}

/// In-memory content store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<u64, ContentItem>,
}

impl MemoryStore {
    pub fn new(items: impl IntoIterator<Item = ContentItem>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &ContentItem> + '_ {
        self.items.values()
    }

    /// First item whose slug (or id fallback) matches.
    pub fn find_by_slug(&self, slug: &str) -> Option<&ContentItem> {
        self.items.values().find(|item| item.slug_or_id() == slug)
    }
}

impl ContentStore for MemoryStore {
    fn load_by_id(&self, id: u64) -> Option<ContentItem> {
        self.items.get(&id).cloned()
    }
}

/// Deduplicated set of preview-enabled ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledSet {
    ids: BTreeSet<u64>,
}

impl EnabledSet {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }
}

impl Registry for EnabledSet {
    fn is_enabled(&self, id: u64) -> bool {
        id > 0 && self.ids.contains(&id)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::item;
    use super::*;

    #[test]
    fn test_slug_falls_back_to_id() {
        assert_eq!(item(7, ContentKind::Post, "").slug_or_id(), "7");
        assert_eq!(item(7, ContentKind::Post, "  ").slug_or_id(), "7");
        assert_eq!(item(7, ContentKind::Post, "hello").slug_or_id(), "hello");
    }

    #[test]
    fn test_memory_store_lookup() {
        let store = MemoryStore::new([item(1, ContentKind::Post, "a"), item(2, ContentKind::Page, "")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.load_by_id(1).map(|i| i.slug), Some("a".to_string()));
        assert!(store.load_by_id(3).is_none());
        assert_eq!(store.find_by_slug("2").map(|i| i.id), Some(2));
    }

    #[test]
    fn test_enabled_set_dedupes_and_ignores_zero() {
        let set = EnabledSet::new([4, 4, 0, 9]);
        assert_eq!(set.len(), 3);
        assert!(set.is_enabled(4));
        assert!(set.is_enabled(9));
        assert!(!set.is_enabled(0));
        assert!(!set.is_enabled(5));
    }

    #[test]
    fn test_content_kind_serde() {
        let kinds: Vec<ContentKind> =
            serde_json::from_str(r#"["post","page","attachment","recipe"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                ContentKind::Post,
                ContentKind::Page,
                ContentKind::Attachment,
                ContentKind::Custom("recipe".to_string()),
            ]
        );
        assert_eq!(kinds[3].to_string(), "recipe");
    }

    #[test]
    fn test_only_publish_is_published() {
        assert!(ContentStatus::Publish.is_published());
        assert!(!ContentStatus::Draft.is_published());
        assert!(!ContentStatus::Private.is_published());
    }
}
