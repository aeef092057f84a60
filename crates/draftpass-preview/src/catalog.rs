//! JSON content catalog.
//!
//! One file holds every content item plus the ids opted into public preview:
//!
//! ```json
//! {
//!   "items": [
//!     { "id": 42, "kind": "post", "slug": "hello", "status": "draft",
//!       "title": "Hello", "body": "Markdown *body*" }
//!   ],
//!   "preview_enabled": [42]
//! }
//! ```
//!
//! The catalog is loaded once at startup and is read-only afterwards.

use std::path::Path;

use draftpass_core::{ContentItem, ContentStore, EnabledSet, MemoryStore, Registry, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ContentItem>,
    #[serde(default)]
    preview_enabled: Vec<u64>,
}

/// Content store and preview registration set backed by one JSON document.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    store: MemoryStore,
    enabled: EnabledSet,
}

impl Catalog {
    pub fn new(
        items: impl IntoIterator<Item = ContentItem>,
        enabled: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            store: MemoryStore::new(items),
            enabled: EnabledSet::new(enabled),
        }
    }

    /// Reads and parses the catalog at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;

        tracing::info!(
            path = %path.display(),
            items = catalog.store.len(),
            preview_enabled = catalog.enabled.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Ok(Self::new(file.items, file.preview_enabled))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    /// Published item addressed by `slug`.
    pub fn published_by_slug(&self, slug: &str) -> Option<ContentItem> {
        self.store
            .find_by_slug(slug)
            .filter(|item| item.status.is_published())
            .cloned()
    }

    /// Published item with `id`.
    pub fn published_by_id(&self, id: u64) -> Option<ContentItem> {
        self.store
            .load_by_id(id)
            .filter(|item| item.status.is_published())
    }

    /// Every published item, ordered by id.
    pub fn published(&self) -> Vec<ContentItem> {
        let mut items: Vec<_> = self
            .store
            .items()
            .filter(|item| item.status.is_published())
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);
        items
    }
}

impl ContentStore for Catalog {
    fn load_by_id(&self, id: u64) -> Option<ContentItem> {
        self.store.load_by_id(id)
    }
}

impl Registry for Catalog {
    fn is_enabled(&self, id: u64) -> bool {
        self.enabled.is_enabled(id)
    }
}
