//! gem2site - gemtext to static HTML site generator
//!
//! Converts a directory tree of gemtext (`.gmi`) documents into a mirrored
//! tree of HTML pages. Other files are copied through unchanged, and
//! destinations newer than their sources are left alone.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod cancel;
pub mod cli;
pub mod document_renderer;
pub mod gemtext;
pub mod highlight;
pub mod line_renderer;
pub mod page_assembler;
pub mod pipeline;
pub mod site_config;
pub mod templates;
pub mod walker;

pub use cancel::CancellationToken;
pub use pipeline::{ConversionReport, ConvertError, SiteBuilder};
pub use site_config::{RenderConfig, SiteConfig};
