//! Whole-document rendering
//!
//! Drives the line renderer over a document's lines, groups maximal runs of
//! list items into a single `<ul>` block and captures the page title.

use crate::gemtext::Line;
use crate::line_renderer::{render_line, CodeHighlight};

/// Title used when a document has no non-empty level-1 heading
pub const DEFAULT_TITLE: &str = "Page";

const LIST_OPEN: &str = "<ul>\n";
const LIST_CLOSE: &str = "</ul>\n";

/// Rendered body and title of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Text of the first non-empty level-1 heading, or [`DEFAULT_TITLE`]
    pub title: String,
    /// HTML content fragment, one line per rendered source line
    pub content: String,
}

/// Render the lines of one document
///
/// # Parameters
/// * `lines` - Typed lines in document order
/// * `highlight` - Highlighting settings for preformatted blocks
///
/// # Returns
/// * `RenderedDocument` - Title and content fragment
pub fn render_document(lines: &[Line], highlight: Option<CodeHighlight<'_>>) -> RenderedDocument {
    let mut content = String::new();
    let mut title: Option<&str> = None;
    let mut in_list = false;

    for line in lines {
        // an empty level-1 heading does not count as a title
        if title.is_none() {
            title = line.as_title().filter(|t| !t.is_empty());
        }

        let rendered = render_line(line, highlight);

        // entering and leaving a list
        if !in_list && rendered.is_list_item {
            content.push_str(LIST_OPEN);
        } else if in_list && !rendered.is_list_item {
            content.push_str(LIST_CLOSE);
        }

        content.push_str(&rendered.html);
        content.push('\n');
        in_list = rendered.is_list_item;
    }

    if in_list {
        content.push_str(LIST_CLOSE);
    }

    RenderedDocument {
        title: title.unwrap_or(DEFAULT_TITLE).to_string(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemtext::{parse, HeadingLevel};
    use pretty_assertions::assert_eq;

    fn item(text: &str) -> Line {
        Line::ListItem(text.to_string())
    }

    fn text(text: &str) -> Line {
        Line::Text(text.to_string())
    }

    #[test]
    fn test_end_to_end_fragment() {
        let lines = parse(b"# Title\n\n=> /x.gmi Link\n* item1\n* item2\n");
        let doc = render_document(&lines, None);

        assert_eq!(doc.title, "Title");
        assert_eq!(
            doc.content,
            "<h1>Title</h1>\n\
             <div class=\"empty-line\"></div>\n\
             <p><a href=\"/x.html\">Link</a></p>\n\
             <ul>\n    <li>item1</li>\n    <li>item2</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_each_run_gets_one_list_block() {
        let lines = vec![
            item("a"),
            item("b"),
            text("between"),
            item("c"),
            Line::Empty,
            item("d"),
            item("e"),
            text("end"),
        ];
        let doc = render_document(&lines, None);

        assert_eq!(doc.content.matches("<ul>").count(), 3);
        assert_eq!(doc.content.matches("</ul>").count(), 3);
        assert_eq!(
            doc.content,
            "<ul>\n    <li>a</li>\n    <li>b</li>\n</ul>\n<p>between</p>\n\
             <ul>\n    <li>c</li>\n</ul>\n<div class=\"empty-line\"></div>\n\
             <ul>\n    <li>d</li>\n    <li>e</li>\n</ul>\n<p>end</p>\n"
        );
    }

    #[test]
    fn test_document_ending_in_list_is_closed() {
        let doc = render_document(&[text("intro"), item("last")], None);
        assert_eq!(doc.content, "<p>intro</p>\n<ul>\n    <li>last</li>\n</ul>\n");
    }

    #[test]
    fn test_title_is_first_level_one_heading() {
        let lines = vec![
            Line::heading(HeadingLevel::H2, "Subtitle"),
            Line::heading(HeadingLevel::H1, "Real Title"),
            Line::heading(HeadingLevel::H1, "Second Title"),
        ];
        let doc = render_document(&lines, None);
        assert_eq!(doc.title, "Real Title");
    }

    #[test]
    fn test_title_defaults_to_placeholder() {
        let doc = render_document(&[Line::heading(HeadingLevel::H2, "Only h2")], None);
        assert_eq!(doc.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_empty_level_one_heading_is_not_a_title() {
        let doc = render_document(&parse(b"#\n# Real\n"), None);
        assert_eq!(doc.title, "Real");

        let doc = render_document(&parse(b"# \nbody\n"), None);
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.content, "<h1></h1>\n<p>body</p>\n");
    }

    #[test]
    fn test_empty_document() {
        let doc = render_document(&[], None);
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.content, "");
    }

    #[test]
    fn test_lines_keep_document_order() {
        let lines = vec![text("1"), text("2"), text("3")];
        let doc = render_document(&lines, None);
        assert_eq!(doc.content, "<p>1</p>\n<p>2</p>\n<p>3</p>\n");
    }
}
