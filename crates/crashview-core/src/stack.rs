//! Stack trace parsing.
//!
//! Converts the conventional multi-line `at ...` stack text produced by
//! JavaScript runtimes into an ordered [`StackTrace`]. Two frame shapes are
//! recognised:
//!
//! ```text
//!     at handler (file:///srv/app/routes.ts:42:17)
//!     at https://deno.land/x/raptor/kernel.ts:88:9
//! ```
//!
//! Every other line (the summary line, `... N more`, blank lines) is
//! ignored. Parsing never fails; text with no frames yields an empty trace.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static FRAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*at\s+(?:(.*?) \((.*):([0-9]+):([0-9]+)\)|(.*):([0-9]+):([0-9]+))$",
    )
    .expect("frame pattern is a valid regex")
});

static ASYNC_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*async\s+").expect("async pattern is a valid regex"));

const FILE_SCHEME: &str = "file://";

/// One call site from a stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Function or method name, if the frame carried one.
    pub method: Option<String>,
    /// Local path or absolute URL, with any `file://` prefix removed.
    pub file: String,
    /// 1-indexed line number as reported by the runtime.
    pub line: u32,
    /// 1-indexed column number as reported by the runtime.
    #[serde(rename = "col")]
    pub column: u32,
}

impl StackFrame {
    /// Parse a single trace line, returning `None` for anything that is not
    /// a frame.
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = FRAME_PATTERN.captures(line)?;

        // Group 2 only participates in the `method (file:line:col)` shape.
        let (method, file, line, column) = match caps.get(2) {
            Some(file) => (
                caps.get(1).map(|m| m.as_str()),
                file.as_str(),
                &caps[3],
                &caps[4],
            ),
            None => (None, &caps[5], &caps[6], &caps[7]),
        };

        Some(Self {
            method: method.and_then(normalize_method),
            file: normalize_file(file).to_string(),
            line: line.parse().ok()?,
            column: column.parse().ok()?,
        })
    }

    /// Whether the file reference is an `http://` or `https://` URL.
    pub fn is_remote(&self) -> bool {
        crate::source::is_remote(&self.file)
    }

    /// `file:line:col`, the way runtimes print a location.
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }
}

impl std::fmt::Display for StackFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.method {
            Some(method) => write!(f, "at {method} ({})", self.location()),
            None => write!(f, "at {}", self.location()),
        }
    }
}

fn normalize_method(raw: &str) -> Option<String> {
    let method = ASYNC_MARKER.replace(raw, "");
    let method = method.trim();
    if method.is_empty() {
        None
    } else {
        Some(method.to_string())
    }
}

fn normalize_file(raw: &str) -> &str {
    raw.strip_prefix(FILE_SCHEME).unwrap_or(raw)
}

/// An ordered, immutable list of frames, innermost call first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackTrace {
    frames: Vec<StackFrame>,
}

impl StackTrace {
    /// Parse raw stack text. Lines that are not frames are skipped.
    pub fn parse(stack: &str) -> Self {
        let frames = stack.lines().filter_map(StackFrame::parse_line).collect();
        Self { frames }
    }

    /// The frames in trace order.
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Iterate the frames in trace order.
    pub fn iter(&self) -> std::slice::Iter<'_, StackFrame> {
        self.frames.iter()
    }

    /// The innermost frame.
    pub fn first(&self) -> Option<&StackFrame> {
        self.frames.first()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a StackFrame;
    type IntoIter = std::slice::Iter<'a, StackFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl From<Vec<StackFrame>> for StackTrace {
    fn from(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }
}
