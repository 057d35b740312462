//! Error handler: raised error in, rendered page out.
//!
//! In development the handler parses the stack, resolves the first frame
//! with readable source, highlights the failing line and renders the
//! development template. In production it renders a generic page and
//! skips every step that could leak source.

use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crashview_config::{AppConfig, ConfigError, Environment};

use crate::extract::{ExtractError, SourceExtractor};
use crate::highlight::{CodeHighlighter, HighlightError};
use crate::source::{ReadError, SourceResolver};
use crate::stack::StackTrace;
use crate::template::{
    BuiltinTemplate, FileTemplate, ProductionTemplate, RenderError, StackContext,
    TemplateContext, TemplateRenderer,
};

/// Status used when the raised error carries none.
pub const DEFAULT_STATUS: u16 = 500;

/// `Content-Type` of every rendered page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Errors from handling a raised error.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("could not parse any stack frames from error stack")]
    EmptyTrace,

    #[error(transparent)]
    Source(#[from] ExtractError),

    #[error(transparent)]
    Highlight(#[from] HighlightError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("handler setup failed: {0}")]
    Setup(#[from] ReadError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// The request that was being served when the error was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    pub uri: String,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
        }
    }
}

/// A runtime error as reported by the host, with its raw stack text.
#[derive(Debug, Clone)]
pub struct RaisedError {
    /// Error class name (e.g. `TypeError`).
    pub type_name: String,
    pub message: String,
    /// Raw multi-line stack text.
    pub stack: String,
    /// HTTP status to respond with; defaults to 500.
    pub status: Option<u16>,
    pub request: Option<RequestInfo>,
}

impl RaisedError {
    pub fn new(
        type_name: impl Into<String>,
        message: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            stack: stack.into(),
            status: None,
            request: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = Some(request);
        self
    }

    /// The status to respond with.
    pub fn status(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_STATUS)
    }
}

/// A rendered error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub status: u16,
    pub body: String,
}

impl ErrorPage {
    pub fn content_type(&self) -> &'static str {
        HTML_CONTENT_TYPE
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], self.body).into_response()
    }
}

/// Composes extraction, highlighting and rendering.
///
/// Holds no per-request state, so one handler behind an `Arc` can serve
/// concurrent requests.
pub struct ErrorHandler {
    environment: Environment,
    extractor: SourceExtractor,
    highlighter: CodeHighlighter,
    template: Arc<dyn TemplateRenderer>,
    production: Arc<dyn TemplateRenderer>,
}

impl ErrorHandler {
    pub fn new(
        environment: Environment,
        extractor: SourceExtractor,
        highlighter: CodeHighlighter,
        template: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            environment,
            extractor,
            highlighter,
            template,
            production: Arc::new(ProductionTemplate),
        }
    }

    /// Replace the renderer used for production pages. It only ever
    /// receives a [`TemplateContext::redacted`] context.
    pub fn with_production_template(mut self, production: Arc<dyn TemplateRenderer>) -> Self {
        self.production = production;
        self
    }

    /// Compose the default pipeline from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, HandlerError> {
        config.validate()?;
        let reader = Arc::new(SourceResolver::from_config(&config.fetch)?);
        let extractor = SourceExtractor::new(reader.clone()).with_radius(config.extractor.radius);
        let highlighter = CodeHighlighter::from_config(&config.highlight);
        let template: Arc<dyn TemplateRenderer> = match &config.template.path {
            Some(path) => Arc::new(FileTemplate::new(path.clone(), reader)),
            None => Arc::new(BuiltinTemplate),
        };

        debug!(
            environment = %config.environment,
            radius = config.extractor.radius,
            template = template.name(),
            "error handler composed"
        );
        Ok(Self::new(config.environment, extractor, highlighter, template))
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Render the page for `error`.
    pub async fn handle(&self, error: &RaisedError) -> Result<ErrorPage, HandlerError> {
        let status = error.status();

        if self.environment == Environment::Production {
            let context = TemplateContext::redacted(error.type_name.clone(), status);
            let body = self.production.render(&context).await?;
            debug!(
                status,
                template = self.production.name(),
                "rendered production error page"
            );
            return Ok(ErrorPage { status, body });
        }

        let trace = StackTrace::parse(&error.stack);
        if trace.is_empty() {
            return Err(HandlerError::EmptyTrace);
        }

        let resolved = self.extractor.extract_first(&trace).await?;
        let code = self.highlighter.highlight_window(&resolved.window).await?;

        let context = TemplateContext {
            code,
            name: error.type_name.clone(),
            message: error.message.clone(),
            stack: StackContext {
                raw: error.stack.clone(),
                lines: trace,
            },
            status,
            request: error.request.clone(),
            file: Some(resolved.frame.file.clone()),
            line: Some(resolved.frame.line),
        };

        let body = self.template.render(&context).await?;
        info!(
            status,
            error = %error.type_name,
            file = %resolved.frame.file,
            line = resolved.frame.line,
            "rendered development error page"
        );

        Ok(ErrorPage { status, body })
    }
}
