//! Line classifier for gemtext documents

use super::line::{HeadingLevel, Line};

/// Marker that opens and closes a preformatted block
const PREFORMAT_TOGGLE: &str = "```";

/// Parse raw document bytes into an ordered sequence of typed lines
///
/// Bytes are decoded as UTF-8 lossily. Parsing never fails: lines that do
/// not match any line type are classified as text, and an unterminated
/// preformatted block runs to the end of the input.
///
/// # Parameters
/// * `bytes` - Raw document content
///
/// # Returns
/// * `Vec<Line>` - Typed lines in document order
pub fn parse(bytes: &[u8]) -> Vec<Line> {
    let source = String::from_utf8_lossy(bytes);
    let mut lines = Vec::new();
    let mut block: Option<PreformattedBlock> = None;

    for raw in source.lines() {
        if let Some(mut open) = block.take() {
            if raw.starts_with(PREFORMAT_TOGGLE) {
                lines.push(open.finish());
            } else {
                open.push(raw);
                block = Some(open);
            }
            continue;
        }

        if let Some(alt) = raw.strip_prefix(PREFORMAT_TOGGLE) {
            block = Some(PreformattedBlock::new(alt));
            continue;
        }

        lines.push(classify(raw));
    }

    if let Some(open) = block {
        lines.push(open.finish());
    }

    lines
}

/// Classify a single line outside of a preformatted block
fn classify(raw: &str) -> Line {
    if let Some(rest) = raw.strip_prefix("=>") {
        return parse_link(rest).unwrap_or_else(|| Line::Text(raw.to_string()));
    }

    if let Some(rest) = raw.strip_prefix("###") {
        return Line::heading(HeadingLevel::H3, rest.trim_start());
    }
    if let Some(rest) = raw.strip_prefix("##") {
        return Line::heading(HeadingLevel::H2, rest.trim_start());
    }
    if let Some(rest) = raw.strip_prefix('#') {
        return Line::heading(HeadingLevel::H1, rest.trim_start());
    }

    if let Some(rest) = raw.strip_prefix("* ") {
        return Line::ListItem(rest.to_string());
    }

    if let Some(rest) = raw.strip_prefix('>') {
        return Line::Blockquote(rest.trim_start().to_string());
    }

    if raw.trim().is_empty() {
        return Line::Empty;
    }

    Line::Text(raw.to_string())
}

/// Parse the part of a link line following `=>`
///
/// Returns `None` when no URL is present.
fn parse_link(rest: &str) -> Option<Line> {
    let rest = rest.trim_start();
    let (url, label) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };

    if url.is_empty() {
        return None;
    }

    Some(Line::link(url, label))
}

/// Accumulator for the lines of an open preformatted block
struct PreformattedBlock {
    alt: Option<String>,
    body: Vec<String>,
}

impl PreformattedBlock {
    fn new(alt: &str) -> Self {
        let alt = alt.trim();
        Self {
            alt: (!alt.is_empty()).then(|| alt.to_string()),
            body: Vec::new(),
        }
    }

    fn push(&mut self, raw: &str) {
        self.body.push(raw.to_string());
    }

    fn finish(self) -> Line {
        Line::Preformatted {
            text: self.body.join("\n"),
            alt: self.alt,
        }
    }
}
