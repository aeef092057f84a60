//! Synthetic single-item result views.
//!
//! A [`DocumentView`] stands in for the host's own query result while a
//! preview renders. It always holds exactly the authorized item and claims
//! to be a singular, non-archive, found preview.

use serde::Serialize;

use crate::content::{ContentItem, ContentKind};
use crate::resolver::AuthorizationContext;

/// Routing flags of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteFlags {
    pub singular: bool,
    pub preview: bool,
    pub archive: bool,
    pub type_archive: bool,
    pub not_found: bool,
}

/// Which single-document template family applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// A plain document (posts and custom types).
    Plain,
    /// A hierarchical page.
    Paged,
    Attachment,
}

impl DocumentType {
    pub fn of(kind: &ContentKind) -> Self {
        match kind {
            ContentKind::Page => Self::Paged,
            ContentKind::Attachment => Self::Attachment,
            ContentKind::Post | ContentKind::Custom(_) => Self::Plain,
        }
    }
}

/// Query variables the view answers to, mirroring how the item would have
/// been addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewVars {
    pub content_type: String,
    pub p: u64,
    /// The id for pages, 0 otherwise.
    pub page_id: u64,
    /// Never empty: the slug, or the id when the slug is empty.
    pub name: String,
    pub id_in_set: Vec<u64>,
}

/// A result set of exactly one item.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    items: [ContentItem; 1],
    document_type: DocumentType,
    flags: RouteFlags,
    vars: ViewVars,
}

impl DocumentView {
    /// The single item; also the queried object.
    pub fn item(&self) -> &ContentItem {
        &self.items[0]
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn queried_object_id(&self) -> u64 {
        self.items[0].id
    }

    /// Items in this view. Always 1.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Total matches. Always 1.
    pub fn found(&self) -> usize {
        self.items.len()
    }

    /// Always 1.
    pub fn max_pages(&self) -> usize {
        1
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn is_plain(&self) -> bool {
        self.document_type == DocumentType::Plain
    }

    pub fn is_paged(&self) -> bool {
        self.document_type == DocumentType::Paged
    }

    pub fn is_attachment(&self) -> bool {
        self.document_type == DocumentType::Attachment
    }

    pub fn flags(&self) -> RouteFlags {
        self.flags
    }

    pub fn vars(&self) -> &ViewVars {
        &self.vars
    }
}

/// Builds [`DocumentView`]s for authorized requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentViewFactory;

impl DocumentViewFactory {
    pub fn build(&self, ctx: &AuthorizationContext) -> DocumentView {
        let item = ctx.item().clone();
        let document_type = DocumentType::of(&item.kind);
        let id = item.id;

        let vars = ViewVars {
            content_type: item.kind.to_string(),
            p: id,
            page_id: if document_type == DocumentType::Paged {
                id
            } else {
                0
            },
            name: item.slug_or_id(),
            id_in_set: vec![id],
        };

        tracing::info!(
            content_id = id,
            content_type = %vars.content_type,
            request_id = %ctx.request_id(),
            "preview view built"
        );

        DocumentView {
            items: [item],
            document_type,
            flags: RouteFlags {
                singular: true,
                preview: true,
                archive: false,
                type_archive: false,
                not_found: false,
            },
            vars,
        }
    }
}
