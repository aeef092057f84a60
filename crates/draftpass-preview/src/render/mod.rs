//! HTML rendering for content items.
//!
//! Each document type has its own template producing a complete page. The
//! same templates serve published items and previews; a preview differs only
//! in its banner and the robots meta tag.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic XSS protection (all dynamic values are escaped).

pub mod attachment;
pub mod components;
pub mod document;
pub mod markdown;

use draftpass_core::{ContentItem, DocumentType, DocumentView};
use maud::{Markup, html};

pub use components::PageMeta;

/// Render one item with the template for `document_type`.
pub fn render_item(
    item: &ContentItem,
    document_type: DocumentType,
    meta: &PageMeta<'_>,
    preview: bool,
) -> Markup {
    match document_type {
        DocumentType::Plain => document::render_post(item, meta, preview),
        DocumentType::Paged => document::render_page(item, meta, preview),
        DocumentType::Attachment => attachment::render(item, meta, preview),
    }
}

/// Render the view committed by the preview pipeline.
pub fn render_view(view: &DocumentView, meta: &PageMeta<'_>) -> Markup {
    render_item(
        view.item(),
        view.document_type(),
        meta,
        view.flags().preview,
    )
}

/// Render a published item.
pub fn render_published(item: &ContentItem, meta: &PageMeta<'_>) -> Markup {
    render_item(item, DocumentType::of(&item.kind), meta, false)
}

/// Render the home page listing published items as `(title, permalink)`.
pub fn render_index(entries: &[(String, String)], meta: &PageMeta<'_>) -> Markup {
    let body = html! {
        h1 class="page-title" { (meta.site_name) }
        @if entries.is_empty() {
            p class="index-empty" { "Nothing has been published yet." }
        } @else {
            ul class="index-list" {
                @for (title, link) in entries {
                    li { a href=(link) { (title) } }
                }
            }
        }
    };

    components::page_shell(meta.site_name, meta.site_name, meta, body)
}
