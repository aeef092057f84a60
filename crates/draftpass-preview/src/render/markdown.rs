//! Markdown bodies to HTML.

use pulldown_cmark::{Event, Options, Parser, TagEnd, html as md_html};

/// Render a markdown body to HTML.
///
/// Tables, footnotes, strikethrough and task lists are enabled. Raw HTML in
/// the source is emitted as escaped text, never as markup.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::with_capacity(markdown.len() * 2);
    md_html::push_html(&mut html_output, parser);
    html_output
}

/// Plain-text excerpt of a markdown body, for meta descriptions.
pub fn excerpt(markdown: &str, max_len: usize) -> String {
    let text: String = Parser::new(markdown)
        .filter_map(|event| match event {
            Event::Text(t) | Event::Code(t) => Some(t.into_string()),
            Event::SoftBreak | Event::HardBreak => Some(" ".to_string()),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_)) => Some(" ".to_string()),
            _ => None,
        })
        .collect();
    super::components::truncate(text.trim(), max_len)
}
