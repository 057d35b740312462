//! Highlight decoration: marking the error-site line for the highlighter.
//!
//! [`CodeHighlighter`] is the validation step between extraction and the
//! syntax engine. It checks that the window is non-empty and that the
//! highlight offset points inside it, then hands the text to a
//! [`SyntaxHighlighter`] with exactly one [`DecorationRegion`] spanning the
//! whole target line.
//!
//! Both checks guard against upstream contract violations; neither is
//! recovered from.

pub mod html;
pub mod syntax;
pub mod theme;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::BoxFuture;
use crate::extract::SourceWindow;

pub use html::HtmlHighlighter;
pub use syntax::{Grammar, TokenKind};
pub use theme::Theme;

/// Class attached to the decoration marking the failing line.
pub const HIGHLIGHTED_LINE_CLASS: &str = "highlighted-line";

/// Errors from decoration and highlighting.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("cannot highlight empty snippet")]
    EmptySnippet,

    #[error("decoration line is out of bounds: {offset} (snippet has {line_count} lines)")]
    DecorationOutOfBounds { offset: usize, line_count: usize },

    #[error("highlighter failed: {0}")]
    Engine(String),
}

/// A span of the window to decorate. Columns count characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecorationRegion {
    pub line_index: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub class: &'static str,
}

impl DecorationRegion {
    /// Region spanning all of `line`, tagged as the error site.
    pub fn full_line(line_index: usize, line: &str) -> Self {
        Self {
            line_index,
            start_column: 0,
            end_column: line.chars().count(),
            class: HIGHLIGHTED_LINE_CLASS,
        }
    }
}

/// Validate a window and build its single decoration.
pub fn decoration_for(
    snippet: &str,
    lines: &[String],
    highlight_offset: usize,
) -> Result<DecorationRegion, HighlightError> {
    if snippet.is_empty() || lines.is_empty() {
        return Err(HighlightError::EmptySnippet);
    }
    let line = lines
        .get(highlight_offset)
        .ok_or(HighlightError::DecorationOutOfBounds {
            offset: highlight_offset,
            line_count: lines.len(),
        })?;
    Ok(DecorationRegion::full_line(highlight_offset, line))
}

/// A syntax highlighting engine.
///
/// Implementations tokenize `source` for `language`, apply every region's
/// class to its span, and return rendered markup.
pub trait SyntaxHighlighter: Send + Sync {
    /// Engine display name.
    fn name(&self) -> &str;

    fn highlight<'a>(
        &'a self,
        source: &'a str,
        language: &'a str,
        regions: &'a [DecorationRegion],
    ) -> BoxFuture<'a, Result<String, HighlightError>>;
}

/// Validates windows and delegates rendering to a [`SyntaxHighlighter`].
pub struct CodeHighlighter {
    engine: Arc<dyn SyntaxHighlighter>,
    language: String,
}

impl CodeHighlighter {
    pub fn new(engine: Arc<dyn SyntaxHighlighter>, language: impl Into<String>) -> Self {
        Self {
            engine,
            language: language.into(),
        }
    }

    /// Build from the `[highlight]` config section using the built-in
    /// HTML engine.
    pub fn from_config(config: &crashview_config::HighlightConfig) -> Self {
        let theme = Theme::by_name(&config.theme).unwrap_or_default();
        Self::new(Arc::new(HtmlHighlighter::new(theme)), config.language.clone())
    }

    /// The language hint passed to the engine.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Highlight `snippet`, decorating `lines[highlight_offset]`.
    pub async fn highlight_code(
        &self,
        snippet: &str,
        lines: &[String],
        highlight_offset: usize,
    ) -> Result<String, HighlightError> {
        let region = decoration_for(snippet, lines, highlight_offset)?;
        debug!(
            engine = self.engine.name(),
            language = %self.language,
            offset = highlight_offset,
            lines = lines.len(),
            "highlighting snippet"
        );
        self.engine
            .highlight(snippet, &self.language, std::slice::from_ref(&region))
            .await
    }

    /// Highlight an extracted window.
    pub async fn highlight_window(&self, window: &SourceWindow) -> Result<String, HighlightError> {
        self.highlight_code(window.text(), window.lines(), window.highlight_offset())
            .await
    }
}
