//! Page assembly via minijinja
//!
//! The page template is compiled once per run. HTML auto-escaping is on for
//! every template regardless of its name, so the title is escaped by the
//! template layer while the rendered content and default stylesheet are
//! passed as safe strings and inserted untouched.

use minijinja::{context, AutoEscape, Environment, Value};
use thiserror::Error;

use crate::document_renderer::RenderedDocument;
use crate::site_config::RenderConfig;
use crate::templates::DEFAULT_CSS;

const PAGE_TEMPLATE: &str = "page.html";

/// Errors that can occur while compiling or rendering the page template
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Error parsing template: {0}")]
    Parse(#[source] minijinja::Error),

    #[error("Execute template failed: {0}")]
    Render(#[source] minijinja::Error),
}

/// Compiled page template plus stylesheet settings
pub struct PageAssembler {
    env: Environment<'static>,
    external_stylesheet: Option<String>,
}

impl PageAssembler {
    /// Compile the template named by the configuration
    ///
    /// # Returns
    /// * `Ok(PageAssembler)` - Template compiled successfully
    /// * `Err(PageError::Parse)` - Template contains a syntax error
    pub fn new(config: &RenderConfig) -> Result<Self, PageError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template_owned(PAGE_TEMPLATE, config.template.clone())
            .map_err(PageError::Parse)?;

        Ok(Self {
            env,
            external_stylesheet: config.external_stylesheet.clone(),
        })
    }

    /// Render a full HTML page for a document
    ///
    /// # Parameters
    /// * `title` - Page title, escaped by the template layer
    /// * `content` - Trusted HTML fragment, inserted without escaping
    ///
    /// # Returns
    /// * `Ok(String)` - The complete page
    /// * `Err(PageError::Render)` - Template execution failed
    pub fn assemble(&self, title: &str, content: &str) -> Result<String, PageError> {
        let template = self
            .env
            .get_template(PAGE_TEMPLATE)
            .map_err(PageError::Render)?;

        template
            .render(context! {
                title => title,
                content => Value::from_safe_string(content.to_string()),
                external_css_file => self.external_stylesheet.as_deref(),
                default_css => Value::from_safe_string(DEFAULT_CSS.to_string()),
            })
            .map_err(PageError::Render)
    }

    /// Render a full HTML page for a rendered document
    pub fn assemble_document(&self, document: &RenderedDocument) -> Result<String, PageError> {
        self.assemble(&document.title, &document.content)
    }
}
