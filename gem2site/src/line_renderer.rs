//! Per-line HTML emission
//!
//! Every typed line maps to one HTML fragment plus a flag telling the
//! document renderer whether the line belongs to a list block. All text
//! coming from the document is escaped here, except the output of the
//! highlighter which is already HTML.

use crate::gemtext::{HeadingLevel, Line, OUTPUT_EXTENSION, SOURCE_EXTENSION};
use crate::highlight::{HighlightError, Highlighter};

/// Highlighting settings for preformatted blocks
#[derive(Clone, Copy)]
pub struct CodeHighlight<'a> {
    /// Loaded syntaxes and themes
    pub highlighter: &'a Highlighter,
    /// Theme name passed to the highlighter
    pub style: &'a str,
}

/// The HTML produced for a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// HTML fragment for the line
    pub html: String,
    /// Whether the line is part of a list block
    pub is_list_item: bool,
}

impl RenderedLine {
    fn block(html: String) -> Self {
        Self {
            html,
            is_list_item: false,
        }
    }

    fn list_item(html: String) -> Self {
        Self {
            html,
            is_list_item: true,
        }
    }
}

/// Render one typed line to HTML
///
/// # Parameters
/// * `line` - The line to render
/// * `highlight` - Highlighting settings, `None` disables highlighting
///
/// # Returns
/// * `RenderedLine` - HTML fragment and list membership
pub fn render_line(line: &Line, highlight: Option<CodeHighlight<'_>>) -> RenderedLine {
    match line {
        Line::Empty => RenderedLine::block(r#"<div class="empty-line"></div>"#.to_string()),
        Line::Text(text) => RenderedLine::block(format!("<p>{}</p>", escape_html(text))),
        Line::Link { url, label } => {
            let url = rewrite_link_url(url);
            let label = if label.is_empty() {
                url.as_str()
            } else {
                label.as_str()
            };
            RenderedLine::block(format!(
                r#"<p><a href="{}">{}</a></p>"#,
                escape_html(&url),
                escape_html(label)
            ))
        }
        Line::Heading { level, text } => {
            let tag = heading_tag(*level);
            RenderedLine::block(format!("<{tag}>{}</{tag}>", escape_html(text)))
        }
        Line::ListItem(text) => {
            RenderedLine::list_item(format!("    <li>{}</li>", escape_html(text)))
        }
        Line::Blockquote(text) => RenderedLine::block(format!(
            "<blockquote><p>{}</p></blockquote>",
            escape_html(text)
        )),
        Line::Preformatted { text, alt } => {
            RenderedLine::block(render_preformatted(text, alt.as_deref(), highlight))
        }
        Line::Unknown(_) => RenderedLine::block(String::new()),
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
    }
}

/// Render a preformatted block, highlighted when a language hint is present
fn render_preformatted(
    text: &str,
    alt: Option<&str>,
    highlight: Option<CodeHighlight<'_>>,
) -> String {
    match (alt, highlight) {
        (Some(language), Some(settings)) => preformatted_or_plain(
            settings
                .highlighter
                .highlight(text, language, settings.style),
            text,
        ),
        _ => plain_preformatted(text),
    }
}

/// Use the highlighter output, or log the failure and fall back to a plain
/// `<pre>` block
fn preformatted_or_plain(result: Result<String, HighlightError>, text: &str) -> String {
    match result {
        Ok(html) => html,
        Err(e) => {
            log::warn!("Error while highlighting code: {}", e);
            plain_preformatted(text)
        }
    }
}

fn plain_preformatted(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html(text))
}

/// Rewrite root-relative links to gemtext documents to their HTML output
///
/// `/en/posts/entry.gmi` becomes `/en/posts/entry.html`. External URLs and
/// links to other file types are returned unchanged.
pub fn rewrite_link_url(url: &str) -> String {
    let source_suffix = format!(".{SOURCE_EXTENSION}");
    if url.starts_with('/') {
        if let Some(stem) = url.strip_suffix(&source_suffix) {
            return format!("{stem}.{OUTPUT_EXTENSION}");
        }
    }
    url.to_string()
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
