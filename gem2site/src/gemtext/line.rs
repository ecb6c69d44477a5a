//! Typed line definitions

/// Heading level supported by gemtext
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric level (1-3)
    pub fn as_u8(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// A single classified line of a gemtext document
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Line {
    /// Blank separator line
    Empty,

    /// A run of prose
    Text(String),

    /// A link line (`=> url label`)
    Link {
        /// Link target as written in the document
        url: String,
        /// Optional human-readable label (empty when absent)
        label: String,
    },

    /// A heading (`#`, `##`, `###`)
    Heading {
        /// Heading level
        level: HeadingLevel,
        /// Heading text
        text: String,
    },

    /// A list item (`* item`)
    ///
    /// Adjacent list items are grouped into one list block when rendered.
    ListItem(String),

    /// A quote line (`> quote`)
    Blockquote(String),

    /// A preformatted block between two ```` ``` ```` fences
    Preformatted {
        /// Raw text of the block, lines joined with `\n`
        text: String,
        /// Alt text following the opening fence, used as a language hint
        alt: Option<String>,
    },

    /// A line kind produced by another parser that this crate cannot display
    Unknown(String),
}

impl Line {
    /// Convenience constructor for a heading line
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Line::Heading {
            level,
            text: text.into(),
        }
    }

    /// Convenience constructor for a link line
    pub fn link(url: impl Into<String>, label: impl Into<String>) -> Self {
        Line::Link {
            url: url.into(),
            label: label.into(),
        }
    }

    /// Convenience constructor for a preformatted block
    pub fn preformatted(text: impl Into<String>, alt: Option<&str>) -> Self {
        Line::Preformatted {
            text: text.into(),
            alt: alt.map(str::to_string),
        }
    }

    /// Text of the line if it is a level-1 heading
    pub fn as_title(&self) -> Option<&str> {
        match self {
            Line::Heading {
                level: HeadingLevel::H1,
                text,
            } => Some(text),
            _ => None,
        }
    }
}
