//! Shared HTML components used by every page.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use draftpass_core::{ContentKind, ContentStatus};
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Inline CSS for content pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#0b6e4f;--warn:#b45309;--border:rgba(11,110,79,.15);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:680px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}

.preview-banner{font-size:.85rem;color:var(--warn);border:1px dashed var(--warn);border-radius:8px;padding:.5rem .75rem;margin-bottom:1rem}
.card{padding:1.5rem;border:1px solid var(--border);border-radius:10px}
.badges{display:flex;gap:.4rem;margin-bottom:.75rem}
.badge{display:inline-block;font-size:.7rem;font-weight:600;text-transform:uppercase;letter-spacing:.04em;padding:.1rem .5rem;border-radius:4px;background:var(--border);color:var(--accent)}
.badge.status{background:rgba(180,83,9,.12);color:var(--warn)}
.doc-title{font-size:1.75rem;font-weight:700;letter-spacing:-.02em;line-height:1.25;margin-bottom:1rem}
.page-title{font-size:2rem;font-weight:700;letter-spacing:-.02em;margin-bottom:1.25rem}
.doc-content{font-size:1.05rem;line-height:1.75}
.doc-content p{margin:0 0 1rem}
.doc-content h1,.doc-content h2,.doc-content h3{margin:1.5rem 0 .75rem;line-height:1.3}
.doc-content pre{font-family:var(--mono);font-size:.85rem;background:rgba(0,0,0,.04);padding:.75rem;border-radius:6px;overflow-x:auto;margin-bottom:1rem}
.doc-content code{font-family:var(--mono);font-size:.9em}
.doc-content blockquote{border-left:3px solid var(--border);padding-left:1rem;color:var(--fg2);margin-bottom:1rem}
.doc-content ul,.doc-content ol{padding-left:1.5rem;margin-bottom:1rem}
.doc-content table{border-collapse:collapse;margin-bottom:1rem}
.doc-content th,.doc-content td{border:1px solid var(--border);padding:.3rem .6rem}
.attachment-file{font-family:var(--mono);font-size:.85rem;color:var(--fg2);margin-bottom:1rem}
.attachment-caption{color:var(--fg2)}

.index-list{list-style:none}
.index-list li{padding:.6rem 0;border-bottom:1px solid var(--border)}
.index-empty{color:var(--fg3)}

.footer{margin-top:2rem;padding:1rem 0;font-size:.8rem;color:var(--fg3);text-align:center}

@media(prefers-color-scheme:dark){
:root{--bg:#0f1412;--fg:#e6ebe8;--fg2:#a3ada8;--fg3:#6b7570;--accent:#4fd1a5;--warn:#f59e0b;--border:rgba(79,209,165,.18)}
.doc-content pre{background:rgba(255,255,255,.05)}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#111;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#0b6e4f}
@media(prefers-color-scheme:dark){
body{background:#0f1412;color:#e6ebe8}
.error-page p{color:#a3ada8}
.error-page a{color:#4fd1a5}
}
"#;

/// Content-Security-Policy header value.
///
/// Inline styles only. No scripts, no frames, HTTPS images.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src https: data:; form-action 'none'; frame-ancestors 'none'";

/// Page-level settings shared by every template.
#[derive(Debug, Clone, Copy)]
pub struct PageMeta<'a> {
    pub site_name: &'a str,
    pub canonical_url: &'a str,
    /// Emit the robots noindex meta tag.
    pub noindex: bool,
    /// Id primed for the page-builder renderer, exposed as a data attribute.
    pub builder_preview_id: Option<&'a str>,
}

/// Render the full HTML page shell with `<head>` and body content.
pub fn page_shell(title: &str, description: &str, meta: &PageMeta<'_>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · " (meta.site_name) }
                meta name="description" content=(description);
                @if meta.noindex {
                    meta name="robots" content="noindex, nofollow";
                } @else {
                    link rel="canonical" href=(meta.canonical_url);
                    meta property="og:title" content=(title);
                    meta property="og:description" content=(description);
                    meta property="og:url" content=(meta.canonical_url);
                    meta property="og:site_name" content=(meta.site_name);
                    meta property="og:type" content="article";
                }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body data-builder-preview-id=[meta.builder_preview_id] {
                main { (body) }
                footer class="footer" {
                    (meta.site_name)
                }
            }
        }
    }
}

/// Notice shown above previewed content.
pub fn preview_banner() -> Markup {
    html! {
        div class="preview-banner" role="note" {
            "Preview of unpublished content. This link expires and should not be shared publicly."
        }
    }
}

/// Kind and (unless published) status badges.
pub fn badges(kind: &ContentKind, status: ContentStatus) -> Markup {
    html! {
        div class="badges" {
            span class="badge" { (kind) }
            @if !status.is_published() {
                span class="badge status" { (status_label(status)) }
            }
        }
    }
}

fn status_label(status: ContentStatus) -> &'static str {
    match status {
        ContentStatus::Draft => "Draft",
        ContentStatus::Pending => "Pending review",
        ContentStatus::Future => "Scheduled",
        ContentStatus::Private => "Private",
        ContentStatus::Publish => "Published",
    }
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(noindex: bool, builder: Option<&str>) -> PageMeta<'_> {
        PageMeta {
            site_name: "Site",
            canonical_url: "https://example.org/x",
            noindex,
            builder_preview_id: builder,
        }
    }

    #[test]
    fn shell_noindex_hides_canonical() {
        let html = page_shell("T", "D", &meta(true, None), html! {}).into_string();
        assert!(html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
        assert!(!html.contains("rel=\"canonical\""));
        assert!(!html.contains("data-builder-preview-id"));
    }

    #[test]
    fn shell_published_has_canonical() {
        let html = page_shell("T", "D", &meta(false, None), html! {}).into_string();
        assert!(html.contains(r#"<link rel="canonical" href="https://example.org/x">"#));
        assert!(!html.contains("noindex"));
        assert!(html.contains("<title>T · Site</title>"));
    }

    #[test]
    fn shell_exposes_builder_id() {
        let html = page_shell("T", "D", &meta(true, Some("42")), html! {}).into_string();
        assert!(html.contains(r#"data-builder-preview-id="42""#));
    }

    #[test]
    fn shell_escapes_title() {
        let html = page_shell("<b>", "D", &meta(true, None), html! {}).into_string();
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn badges_show_status_only_when_unpublished() {
        let draft = badges(&ContentKind::Post, ContentStatus::Draft).into_string();
        assert!(draft.contains("Draft"));
        let live = badges(&ContentKind::Page, ContentStatus::Publish).into_string();
        assert!(!live.contains("badge status"));
        assert!(live.contains("page"));
    }

    #[test]
    fn truncate_short_and_long() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("héllo", 2), "h...");
    }
}
