//! Color themes for the built-in HTML highlighter.

use super::syntax::TokenKind;

/// Colors applied to the rendered code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
    /// Background of the decorated (failing) line.
    pub highlight_background: &'static str,
    /// Left border accent of the decorated line.
    pub accent: &'static str,
    pub comment: &'static str,
    pub keyword: &'static str,
    pub function: &'static str,
    pub string: &'static str,
    pub variable: &'static str,
    pub constant: &'static str,
    pub type_name: &'static str,
    pub operator: &'static str,
}

impl Theme {
    /// Dark theme used by default.
    pub const RAPTOR: Theme = Theme {
        name: "raptor",
        background: "#1a1f2e",
        foreground: "#e4e4e7",
        highlight_background: "#3b1d2e",
        accent: "#f472b6",
        comment: "#64748b",
        keyword: "#f472b6",
        function: "#c4b5fd",
        string: "#86efac",
        variable: "#c4b5fd",
        constant: "#c4b5fd",
        type_name: "#c4b5fd",
        operator: "#f472b6",
    };

    /// Light theme for printing and high-contrast displays.
    pub const PLAIN: Theme = Theme {
        name: "plain",
        background: "#ffffff",
        foreground: "#1f2937",
        highlight_background: "#fee2e2",
        accent: "#dc2626",
        comment: "#6b7280",
        keyword: "#be185d",
        function: "#6d28d9",
        string: "#15803d",
        variable: "#4338ca",
        constant: "#b45309",
        type_name: "#0e7490",
        operator: "#be185d",
    };

    /// Look up a theme by its config name.
    pub fn by_name(name: &str) -> Option<Theme> {
        match name {
            "raptor" => Some(Self::RAPTOR),
            "plain" => Some(Self::PLAIN),
            _ => None,
        }
    }

    /// Foreground color for a token.
    pub fn token_color(&self, kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Comment => self.comment,
            TokenKind::Keyword => self.keyword,
            TokenKind::Function => self.function,
            TokenKind::String => self.string,
            TokenKind::Variable => self.variable,
            TokenKind::Constant => self.constant,
            TokenKind::Type => self.type_name,
            TokenKind::Operator => self.operator,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::RAPTOR
    }
}
