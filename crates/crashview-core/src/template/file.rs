//! User-supplied templates with `{{ key }}` placeholders.
//!
//! The template is loaded on every render through the same
//! [`SourceReader`] used for stack frames, so it may live on disk or behind
//! a URL. Keys are the dotted names produced by
//! [`TemplateContext::flatten`]. `{{ code }}` is inserted as-is; every other
//! value is HTML-escaped. Unknown keys render as empty strings.

use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use tracing::debug;

use crate::BoxFuture;
use crate::escape::escape_html;
use crate::source::SourceReader;

use super::{RenderError, TemplateContext, TemplateRenderer};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("placeholder pattern is a valid regex")
});

/// Template read from a local path or URL.
pub struct FileTemplate {
    path: String,
    reader: Arc<dyn SourceReader>,
}

impl FileTemplate {
    pub fn new(path: impl Into<String>, reader: Arc<dyn SourceReader>) -> Self {
        Self {
            path: path.into(),
            reader,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Substitute placeholders in `template` from `context`.
    pub fn fill(template: &str, context: &TemplateContext) -> Result<String, RenderError> {
        let values = context.flatten()?;
        let filled = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            match values.get(key) {
                Some(value) if key == "code" => value.clone(),
                Some(value) => escape_html(value),
                None => String::new(),
            }
        });
        Ok(filled.into_owned())
    }
}

impl TemplateRenderer for FileTemplate {
    fn name(&self) -> &str {
        "file"
    }

    fn render<'a>(&'a self, context: &'a TemplateContext) -> BoxFuture<'a, Result<String, RenderError>> {
        Box::pin(async move {
            let template =
                self.reader
                    .read_text(&self.path)
                    .await
                    .map_err(|source| RenderError::NotFound {
                        path: self.path.clone(),
                        source,
                    })?;

            if template.trim().is_empty() {
                return Err(RenderError::EmptyTemplate(self.path.clone()));
            }

            debug!(path = %self.path, reader = self.reader.name(), "rendering file template");
            Self::fill(&template, context)
        })
    }
}
