//! Built-in HTML highlighter.
//!
//! Renders source as an escaped `<pre><code>` block, one `<span class="line">`
//! per line. Languages with a known [`Grammar`] are tokenized and each token
//! is wrapped in `<span class="token <kind>">` colored from the [`Theme`].
//! Decoration regions are wrapped in a span carrying the region's class,
//! nested outside the token spans they cover.

use crate::BoxFuture;
use crate::escape::escape_html;

use super::syntax::{Grammar, Token, TokenKind, tokenize};
use super::{DecorationRegion, HighlightError, SyntaxHighlighter, Theme};

/// A run of one line's text with at most one token kind.
type Segment<'s> = (&'s str, Option<TokenKind>);

/// HTML renderer with a fixed color [`Theme`].
#[derive(Debug, Clone, Default)]
pub struct HtmlHighlighter {
    theme: Theme,
}

impl HtmlHighlighter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render synchronously; the trait method wraps this.
    pub fn render(
        &self,
        source: &str,
        language: &str,
        regions: &[DecorationRegion],
    ) -> Result<String, HighlightError> {
        let lines: Vec<&str> = source.split('\n').collect();
        if let Some(bad) = regions.iter().find(|r| r.line_index >= lines.len()) {
            return Err(HighlightError::Engine(format!(
                "region targets line {} but source has {} lines",
                bad.line_index,
                lines.len()
            )));
        }

        let tokens = match Grammar::for_language(language) {
            Some(grammar) => tokenize(source, grammar)?,
            None => Vec::new(),
        };

        let t = &self.theme;
        let mut out = format!(
            "<pre class=\"crashview-code theme-{}\" style=\"background-color:{};color:{}\"><code class=\"language-{}\">",
            t.name,
            t.background,
            t.foreground,
            escape_html(language)
        );

        let mut line_start = 0;
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let segments = line_segments(line, line_start, &tokens);
            out.push_str("<span class=\"line\">");
            match regions.iter().find(|r| r.line_index == index) {
                Some(region) => self.push_decorated(&mut out, &segments, region),
                None => {
                    for (text, kind) in &segments {
                        self.push_segment(&mut out, text, *kind);
                    }
                }
            }
            out.push_str("</span>");
            line_start += line.len() + 1;
        }

        out.push_str("</code></pre>");
        Ok(out)
    }

    fn push_segment(&self, out: &mut String, text: &str, kind: Option<TokenKind>) {
        match kind {
            Some(kind) => {
                let italic = if kind == TokenKind::Comment {
                    ";font-style:italic"
                } else {
                    ""
                };
                out.push_str(&format!(
                    "<span class=\"token {}\" style=\"color:{}{italic}\">{}</span>",
                    kind.class(),
                    self.theme.token_color(kind),
                    escape_html(text)
                ));
            }
            None => out.push_str(&escape_html(text)),
        }
    }

    fn open_region(&self, out: &mut String, region: &DecorationRegion) {
        out.push_str(&format!(
            "<span class=\"{}\" style=\"background-color:{};box-shadow:inset 3px 0 {}\">",
            region.class, self.theme.highlight_background, self.theme.accent
        ));
    }

    /// Emit `segments`, splitting them at the region's column bounds.
    fn push_decorated(&self, out: &mut String, segments: &[Segment<'_>], region: &DecorationRegion) {
        let start = region.start_column;
        let end = region.end_column.max(start);

        if segments.iter().all(|(text, _)| text.is_empty()) {
            self.open_region(out, region);
            out.push_str("</span>");
            return;
        }

        let mut column = 0;
        let mut open = false;
        for (text, kind) in segments {
            let mut rest = *text;
            while !rest.is_empty() {
                if !open && column >= start && column < end {
                    self.open_region(out, region);
                    open = true;
                } else if open && column >= end {
                    out.push_str("</span>");
                    open = false;
                }

                let len = rest.chars().count();
                let take = [start, end]
                    .into_iter()
                    .filter(|&b| b > column && b < column + len)
                    .min()
                    .map_or(len, |b| b - column);
                let split = rest
                    .char_indices()
                    .nth(take)
                    .map_or(rest.len(), |(i, _)| i);

                self.push_segment(out, &rest[..split], *kind);
                rest = &rest[split..];
                column += take;
            }
        }
        if open {
            out.push_str("</span>");
        }
    }
}

/// Cut one line into plain and token segments. `line_start` is the line's
/// byte offset in the full source; tokens spanning lines are clipped.
fn line_segments<'s>(line: &'s str, line_start: usize, tokens: &[Token]) -> Vec<Segment<'s>> {
    let line_end = line_start + line.len();
    let mut segments = Vec::new();
    let mut pos = line_start;

    for token in tokens
        .iter()
        .filter(|t| t.end > line_start && t.start < line_end)
    {
        let start = token.start.max(line_start);
        let end = token.end.min(line_end);
        if start < pos {
            continue;
        }
        if start > pos {
            segments.push((&line[pos - line_start..start - line_start], None));
        }
        segments.push((&line[start - line_start..end - line_start], Some(token.kind)));
        pos = end;
    }
    if pos < line_end {
        segments.push((&line[pos - line_start..], None));
    }
    segments
}

impl SyntaxHighlighter for HtmlHighlighter {
    fn name(&self) -> &str {
        "html"
    }

    fn highlight<'a>(
        &'a self,
        source: &'a str,
        language: &'a str,
        regions: &'a [DecorationRegion],
    ) -> BoxFuture<'a, Result<String, HighlightError>> {
        Box::pin(async move { self.render(source, language, regions) })
    }
}
