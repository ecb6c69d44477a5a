//! Gemtext source model
//!
//! This module turns the raw bytes of a `.gmi` document into an ordered
//! sequence of typed lines. Classification is line-oriented and lenient:
//! every input produces a line sequence, malformed lines fall back to text.

mod line;
mod parser;

pub use line::{HeadingLevel, Line};
pub use parser::parse;

/// File extension of gemtext documents (without the dot)
pub const SOURCE_EXTENSION: &str = "gmi";

/// File extension written for converted documents (without the dot)
pub const OUTPUT_EXTENSION: &str = "html";
