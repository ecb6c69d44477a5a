//! Built-in page template and stylesheet
//!
//! Both are compiled into the binary and used whenever the site
//! configuration does not name a replacement.

/// Default page template (minijinja syntax)
///
/// Variables: `title`, `content`, `external_css_file`, `default_css`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/page.html");

/// Default stylesheet, inlined into pages without an external stylesheet
pub const DEFAULT_CSS: &str = include_str!("templates/default.css");

/// Text printed by `--dump`: the template, a blank line, then the stylesheet
pub fn dump_defaults() -> String {
    format!("{}\n\n{}", DEFAULT_TEMPLATE.trim_end(), DEFAULT_CSS.trim_end())
}
