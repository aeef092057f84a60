//! Templates for plain documents (posts, custom types) and pages.

use draftpass_core::ContentItem;
use maud::{Markup, PreEscaped, html};

use super::components::{PageMeta, badges, page_shell, preview_banner};
use super::markdown::{excerpt, render_markdown};

/// Description length for meta tags.
const DESCRIPTION_LEN: usize = 160;

/// Render a post or custom-type document.
pub fn render_post(item: &ContentItem, meta: &PageMeta<'_>, preview: bool) -> Markup {
    let title = display_title(item);
    let description = excerpt(&item.body, DESCRIPTION_LEN);

    let body = html! {
        @if preview {
            (preview_banner())
        }
        article class="card" {
            (badges(&item.kind, item.status))
            h1 class="doc-title" { (title) }
            div class="doc-content" {
                (PreEscaped(render_markdown(&item.body)))
            }
        }
    };

    page_shell(&title, &description, meta, body)
}

/// Render a hierarchical page. Pages carry no kind badge.
pub fn render_page(item: &ContentItem, meta: &PageMeta<'_>, preview: bool) -> Markup {
    let title = display_title(item);
    let description = excerpt(&item.body, DESCRIPTION_LEN);

    let body = html! {
        @if preview {
            (preview_banner())
        }
        article {
            h1 class="page-title" { (title) }
            div class="doc-content" {
                (PreEscaped(render_markdown(&item.body)))
            }
        }
    };

    page_shell(&title, &description, meta, body)
}

/// The title, or "(no title)" for untitled items.
pub fn display_title(item: &ContentItem) -> String {
    let title = item.title.trim();
    if title.is_empty() {
        "(no title)".to_string()
    } else {
        title.to_string()
    }
}
