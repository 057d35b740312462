//! Page templates and the context payload they consume.
//!
//! The handler assembles a [`TemplateContext`] (highlighted code, error
//! name and message, raw and parsed stack, request line) and passes it to a
//! [`TemplateRenderer`]. Three renderers ship with the crate:
//!
//! - [`BuiltinTemplate`]: self-contained development page
//! - [`FileTemplate`]: user template with `{{ key }}` placeholders
//! - [`ProductionTemplate`]: generic page that reveals nothing

pub mod builtin;
pub mod file;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::BoxFuture;
use crate::handler::RequestInfo;
use crate::source::ReadError;
use crate::stack::StackTrace;

pub use builtin::{BuiltinTemplate, ProductionTemplate};
pub use file::FileTemplate;

/// Errors from template rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template file not found: {path}")]
    NotFound {
        path: String,
        #[source]
        source: ReadError,
    },

    #[error("template file is empty: {0}")]
    EmptyTemplate(String),

    #[error("failed to serialize template context: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Raw and parsed forms of the stack.
#[derive(Debug, Clone, Serialize)]
pub struct StackContext {
    pub raw: String,
    pub lines: StackTrace,
}

/// Everything a template may render.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// Highlighted HTML fragment. Inserted unescaped.
    pub code: String,
    /// Error class name (e.g. `TypeError`).
    pub name: String,
    pub message: String,
    pub stack: StackContext,
    /// HTTP status the page is served with.
    pub status: u16,
    pub request: Option<RequestInfo>,
    /// File of the frame whose source is shown.
    pub file: Option<String>,
    /// Line of the frame whose source is shown.
    pub line: Option<u32>,
}

impl TemplateContext {
    /// Context for production pages: status and error class only.
    pub fn redacted(name: impl Into<String>, status: u16) -> Self {
        Self {
            code: String::new(),
            name: name.into(),
            message: String::new(),
            stack: StackContext {
                raw: String::new(),
                lines: StackTrace::default(),
            },
            status,
            request: None,
            file: None,
            line: None,
        }
    }

    /// Flatten into dotted keys (`stack.raw`, `request.method`, ...).
    ///
    /// `stack.lines` is rendered as JSON. Absent optional values are omitted.
    pub fn flatten(&self) -> Result<BTreeMap<String, String>, RenderError> {
        let mut map = BTreeMap::new();
        map.insert("code".to_string(), self.code.clone());
        map.insert("name".to_string(), self.name.clone());
        map.insert("message".to_string(), self.message.clone());
        map.insert("stack.raw".to_string(), self.stack.raw.clone());
        map.insert(
            "stack.lines".to_string(),
            serde_json::to_string(&self.stack.lines)?,
        );
        map.insert("status".to_string(), self.status.to_string());
        if let Some(request) = &self.request {
            map.insert("request.method".to_string(), request.method.clone());
            map.insert("request.uri".to_string(), request.uri.clone());
        }
        if let Some(file) = &self.file {
            map.insert("file".to_string(), file.clone());
        }
        if let Some(line) = self.line {
            map.insert("line".to_string(), line.to_string());
        }
        Ok(map)
    }
}

/// A template-rendering collaborator.
pub trait TemplateRenderer: Send + Sync {
    /// Renderer display name.
    fn name(&self) -> &str;

    /// Render the page body for `context`.
    fn render<'a>(&'a self, context: &'a TemplateContext) -> BoxFuture<'a, Result<String, RenderError>>;
}
