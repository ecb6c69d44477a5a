//! Site configuration from gem2site.toml and command-line overrides

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::templates::DEFAULT_TEMPLATE;

/// Theme used for highlighting when neither the CLI nor the file names one
pub const DEFAULT_HIGHLIGHT_STYLE: &str = crate::highlight::FALLBACK_THEME;

/// Optional settings read from a gem2site.toml file
///
/// Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of an external page template, relative to the config file
    pub template: Option<PathBuf>,

    /// Href of an external stylesheet used instead of the inlined default
    pub stylesheet: Option<String>,

    /// Highlighting theme; an empty string disables highlighting
    pub highlight_style: Option<String>,
}

impl SiteConfig {
    /// Load configuration from a gem2site.toml file
    ///
    /// A relative `template` path is resolved against the directory that
    /// contains the configuration file.
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SiteConfig)` - Successfully loaded configuration
    /// * `Err(SiteConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SiteConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SiteConfigError::Read(path.to_path_buf(), e))?;

        let mut config: SiteConfig = toml::from_str(&content)
            .map_err(|e| SiteConfigError::Parse(path.to_path_buf(), e))?;

        if let (Some(template), Some(base)) = (config.template.as_mut(), path.parent()) {
            if template.is_relative() {
                *template = base.join(&*template);
            }
        }

        Ok(config)
    }
}

/// Immutable settings for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Page template source
    pub template: String,

    /// External stylesheet href; `None` inlines the default stylesheet
    pub external_stylesheet: Option<String>,

    /// Highlighting theme; `None` disables highlighting
    pub highlight_style: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            external_stylesheet: None,
            highlight_style: Some(DEFAULT_HIGHLIGHT_STYLE.to_string()),
        }
    }
}

/// Values given on the command line, each overriding the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// External template file
    pub template: Option<PathBuf>,
    /// External stylesheet href
    pub stylesheet: Option<String>,
    /// Highlighting theme, empty disables highlighting
    pub highlight_style: Option<String>,
}

impl RenderConfig {
    /// Merge command-line overrides, file settings and built-in defaults
    ///
    /// Precedence is command line, then config file, then defaults. The
    /// selected template file is read here so the run works on an
    /// in-memory template.
    pub fn resolve(file: SiteConfig, overrides: Overrides) -> Result<Self, SiteConfigError> {
        let template = match overrides.template.or(file.template) {
            Some(path) => fs::read_to_string(&path)
                .map_err(|e| SiteConfigError::Template(path.clone(), e))?,
            None => DEFAULT_TEMPLATE.to_string(),
        };

        let external_stylesheet = overrides
            .stylesheet
            .or(file.stylesheet)
            .filter(|href| !href.is_empty());

        let highlight_style = overrides
            .highlight_style
            .or(file.highlight_style)
            .unwrap_or_else(|| DEFAULT_HIGHLIGHT_STYLE.to_string());

        Ok(Self {
            template,
            external_stylesheet,
            highlight_style: (!highlight_style.is_empty()).then_some(highlight_style),
        })
    }
}

/// Errors that can occur while building the run configuration
#[derive(Error, Debug)]
pub enum SiteConfigError {
    #[error("IO error reading config {path}: {source}", path = .0.display(), source = .1)]
    Read(PathBuf, #[source] std::io::Error),

    #[error("TOML parse error in {path}: {source}", path = .0.display(), source = .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Cannot read template {path}: {source}", path = .0.display(), source = .1)]
    Template(PathBuf, #[source] std::io::Error),
}
