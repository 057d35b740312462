//! Builder for raw stack text in the runtime's `at ...` format.

/// Fluent builder for stack strings.
///
/// # Example
///
/// ```ignore
/// let stack = StackBuilder::new("TypeError: boom")
///     .frame("handler", "/srv/app.ts", 12, 5)
///     .anonymous("https://deno.land/x/mod.ts", 3, 1)
///     .build();
/// ```
pub struct StackBuilder {
    text: String,
}

impl StackBuilder {
    /// Start with the summary line.
    pub fn new(summary: &str) -> Self {
        Self {
            text: summary.to_string(),
        }
    }

    /// `at method (file:line:col)`
    pub fn frame(mut self, method: &str, file: &str, line: u32, col: u32) -> Self {
        self.text
            .push_str(&format!("\n    at {method} ({file}:{line}:{col})"));
        self
    }

    /// `at file:line:col`
    pub fn anonymous(mut self, file: &str, line: u32, col: u32) -> Self {
        self.text.push_str(&format!("\n    at {file}:{line}:{col}"));
        self
    }

    /// A line that is not a frame.
    pub fn noise(mut self, line: &str) -> Self {
        self.text.push('\n');
        self.text.push_str(line);
        self
    }

    pub fn build(self) -> String {
        self.text
    }
}
