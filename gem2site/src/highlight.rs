//! Syntax highlighting for preformatted blocks
//!
//! Wraps syntect so that lexer and theme resolution never fail outright:
//! an unknown language hint falls back to first-line detection and then to
//! plain text, an unknown theme falls back to [`FALLBACK_THEME`]. Only
//! tokenization errors reach the caller.

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use thiserror::Error;

/// Theme used when the requested style is not recognized
pub const FALLBACK_THEME: &str = "InspiredGitHub";

/// Errors that can occur while highlighting a block
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("No highlighting theme is available")]
    NoTheme,

    #[error("Failed to highlight {language} block: {source}")]
    Tokenize {
        language: String,
        #[source]
        source: syntect::Error,
    },
}

/// Loaded syntax definitions and themes
///
/// Loading the bundled sets is comparatively expensive, so one instance is
/// built per run and shared by every document.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Highlighter {
    /// Load syntect's bundled syntaxes and themes
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Names of every theme usable as a style
    pub fn theme_names(&self) -> impl Iterator<Item = &str> {
        self.themes.themes.keys().map(String::as_str)
    }

    /// Highlight `source` as an inline HTML fragment
    ///
    /// # Parameters
    /// * `source` - Raw text of the preformatted block
    /// * `language` - Language hint (file extension or syntax name)
    /// * `style` - Theme name
    ///
    /// # Returns
    /// * `Ok(String)` - A styled `<pre>` element, safe to embed as-is
    /// * `Err(HighlightError)` - Tokenization failed
    pub fn highlight(
        &self,
        source: &str,
        language: &str,
        style: &str,
    ) -> Result<String, HighlightError> {
        let syntax = self.resolve_syntax(source, language);
        let theme = self.resolve_theme(style)?;

        log::debug!(
            "Highlighting block as {} with theme {}",
            syntax.name,
            theme.name.as_deref().unwrap_or(style)
        );

        // syntect's newline syntaxes expect every line to be terminated
        let mut text = source.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }

        highlighted_html_for_string(&text, &self.syntaxes, syntax, theme).map_err(|source| {
            HighlightError::Tokenize {
                language: language.to_string(),
                source,
            }
        })
    }

    fn resolve_syntax(&self, source: &str, language: &str) -> &SyntaxReference {
        let language = language.trim();
        let by_hint = if language.is_empty() {
            None
        } else {
            self.syntaxes.find_syntax_by_token(language)
        };

        by_hint
            .or_else(|| {
                source
                    .lines()
                    .next()
                    .and_then(|first| self.syntaxes.find_syntax_by_first_line(first))
            })
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn resolve_theme(&self, style: &str) -> Result<&Theme, HighlightError> {
        self.themes
            .themes
            .get(style)
            .or_else(|| {
                log::debug!("Unknown highlight style '{}', using {}", style, FALLBACK_THEME);
                self.themes.themes.get(FALLBACK_THEME)
            })
            .or_else(|| self.themes.themes.values().next())
            .ok_or(HighlightError::NoTheme)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}
