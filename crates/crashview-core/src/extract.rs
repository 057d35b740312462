//! Source window extraction: the context shown around a failing line.
//!
//! For a frame pointing at line `t` of a file with `L` lines, the window
//! keeps up to `radius` lines on each side of `t`, clipped to the file:
//!
//! ```text
//! start = max(0, t - 1 - radius)
//! end   = min(L, t - 1 + radius + 1)      (exclusive)
//! highlight_offset = (t - 1) - start
//! ```
//!
//! [`SourceExtractor::extract_first`] walks a trace innermost-first and
//! returns the first frame whose source could be read and whose line is in
//! range. Per-frame failures are logged and skipped, never surfaced.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::source::{ReadError, SourceReader};
use crate::stack::{StackFrame, StackTrace};

/// Lines of context kept on each side of the target line by default.
pub const DEFAULT_RADIUS: usize = 10;

/// Why a single frame could not be turned into a window.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame has no file reference")]
    MissingFile,

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("line {line} is outside the file ({total} lines)")]
    LineOutOfRange { line: u32, total: usize },

    #[error("computed source window is empty")]
    EmptyWindow,
}

/// Aggregate extraction failure surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no readable source for any of {attempted} stack frame(s)")]
    NotFound { attempted: usize },
}

/// A run of consecutive source lines around a target line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWindow {
    text: String,
    lines: Vec<String>,
    highlight_offset: usize,
    start_line: usize,
}

impl SourceWindow {
    /// Carve a window out of full source text.
    ///
    /// `line` is 1-indexed; `0` or anything past the last line is rejected.
    pub fn from_source(source: &str, line: u32, radius: usize) -> Result<Self, FrameError> {
        let lines: Vec<&str> = source.lines().collect();
        Self::from_lines(&lines, line, radius)
    }

    /// Carve a window out of pre-split source lines.
    pub fn from_lines<S: AsRef<str>>(
        lines: &[S],
        line: u32,
        radius: usize,
    ) -> Result<Self, FrameError> {
        let total = lines.len();
        let target = match usize::try_from(line) {
            Ok(l) if l >= 1 && l <= total => l - 1,
            _ => return Err(FrameError::LineOutOfRange { line, total }),
        };

        let start = target.saturating_sub(radius);
        let end = total.min(target.saturating_add(radius).saturating_add(1));

        let window: Vec<String> = lines[start..end]
            .iter()
            .map(|l| l.as_ref().to_string())
            .collect();
        // A single blank line joins to "", which the decorator rejects.
        let text = window.join("\n");
        if text.is_empty() {
            return Err(FrameError::EmptyWindow);
        }

        Ok(Self {
            text,
            lines: window,
            highlight_offset: target - start,
            start_line: start + 1,
        })
    }

    /// The window lines joined with `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// One entry per source line in the window.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 0-indexed position of the target line within [`lines`](Self::lines).
    pub fn highlight_offset(&self) -> usize {
        self.highlight_offset
    }

    /// 1-indexed file line number of the first window line.
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// The target line itself.
    pub fn highlighted_line(&self) -> &str {
        &self.lines[self.highlight_offset]
    }

    /// Iterate `(file line number, text)` pairs.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, l)| (self.start_line + i, l.as_str()))
    }
}

/// A window together with the frame that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedFrame {
    pub window: SourceWindow,
    pub frame: StackFrame,
    /// Position of `frame` within the trace.
    pub index: usize,
}

/// Reads frame sources and extracts windows around failing lines.
pub struct SourceExtractor {
    reader: Arc<dyn SourceReader>,
    radius: usize,
}

impl SourceExtractor {
    /// Create an extractor with the default radius.
    pub fn new(reader: Arc<dyn SourceReader>) -> Self {
        Self {
            reader,
            radius: DEFAULT_RADIUS,
        }
    }

    /// Set the number of context lines kept on each side.
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Extract the window for a single frame.
    pub async fn extract(&self, frame: &StackFrame) -> Result<SourceWindow, FrameError> {
        if frame.file.is_empty() {
            return Err(FrameError::MissingFile);
        }
        let source = self.reader.read_text(&frame.file).await?;
        SourceWindow::from_source(&source, frame.line, self.radius)
    }

    /// Try each frame in order and return the first that resolves.
    ///
    /// Frames without a file are skipped without a read attempt. Frames are
    /// attempted strictly one after another.
    pub async fn extract_first(&self, trace: &StackTrace) -> Result<ResolvedFrame, ExtractError> {
        let mut attempted = 0;

        for (index, frame) in trace.iter().enumerate() {
            if frame.file.is_empty() {
                continue;
            }
            attempted += 1;

            match self.extract(frame).await {
                Ok(window) => {
                    info!(
                        file = %frame.file,
                        line = frame.line,
                        index,
                        reader = self.reader.name(),
                        "resolved source for stack frame"
                    );
                    return Ok(ResolvedFrame {
                        window,
                        frame: frame.clone(),
                        index,
                    });
                }
                Err(e) => {
                    debug!(file = %frame.file, line = frame.line, error = %e, "stack frame unresolved");
                }
            }
        }

        warn!(
            frames = trace.len(),
            attempted, "no stack frame resolved to readable source"
        );
        Err(ExtractError::NotFound { attempted })
    }
}
