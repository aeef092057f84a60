//! Attachment template.
//!
//! The slug doubles as the file name; the body is the caption.

use draftpass_core::ContentItem;
use maud::{Markup, PreEscaped, html};

use super::components::{PageMeta, badges, page_shell, preview_banner};
use super::document::display_title;
use super::markdown::{excerpt, render_markdown};

pub fn render(item: &ContentItem, meta: &PageMeta<'_>, preview: bool) -> Markup {
    let title = display_title(item);
    let description = excerpt(&item.body, 160);
    let file_name = item.slug_or_id();

    let body = html! {
        @if preview {
            (preview_banner())
        }
        figure class="card" {
            (badges(&item.kind, item.status))
            h1 class="doc-title" { (title) }
            div class="attachment-file" { (file_name) }
            @if !item.body.trim().is_empty() {
                figcaption class="attachment-caption doc-content" {
                    (PreEscaped(render_markdown(&item.body)))
                }
            }
        }
    };

    page_shell(&title, &description, meta, body)
}
