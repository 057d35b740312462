//! Token classification with tree-sitter.
//!
//! Source windows are cut out of the middle of a file, so they rarely parse
//! cleanly. tree-sitter recovers from that and still yields leaf tokens, which
//! is all the highlighter needs. Nodes are classified by kind while walking the
//! tree; a classified node is not descended into, so tokens never overlap.

use tree_sitter::{Language, Node, Parser};

use super::HighlightError;

/// Token categories that map onto theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Keyword,
    Function,
    String,
    Variable,
    Constant,
    Type,
    Operator,
}

impl TokenKind {
    /// CSS class suffix (`token <class>`).
    pub fn class(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Keyword => "keyword",
            TokenKind::Function => "function",
            TokenKind::String => "string",
            TokenKind::Variable => "variable",
            TokenKind::Constant => "constant",
            TokenKind::Type => "type",
            TokenKind::Operator => "operator",
        }
    }
}

/// A classified byte range of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

/// Grammars the built-in highlighter can tokenize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// TypeScript; also used for plain JavaScript.
    TypeScript,
    /// TSX; also used for JSX.
    Tsx,
}

impl Grammar {
    /// Map a language hint to a grammar. Unknown hints are not tokenized.
    pub fn for_language(hint: &str) -> Option<Self> {
        match hint.to_ascii_lowercase().as_str() {
            "ts" | "typescript" | "mts" | "cts" | "js" | "javascript" | "mjs" | "cjs" => {
                Some(Grammar::TypeScript)
            }
            "tsx" | "jsx" => Some(Grammar::Tsx),
            _ => None,
        }
    }

    fn language(self) -> Language {
        match self {
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "break", "case", "catch", "class", "const", "continue",
    "debugger", "declare", "default", "delete", "do", "else", "enum", "export", "extends",
    "finally", "for", "from", "function", "get", "if", "implements", "import", "in",
    "instanceof", "interface", "keyof", "let", "namespace", "new", "of", "private", "protected",
    "public", "readonly", "return", "satisfies", "set", "static", "switch", "throw", "try",
    "type", "typeof", "var", "void", "while", "with", "yield",
];

const OPERATORS: &[&str] = &[
    "=", "=>", "==", "===", "!=", "!==", "+", "-", "*", "/", "%", "**", "&&", "||", "??", "!",
    "+=", "-=", "*=", "/=", "??=", "||=", "&&=", "<=", ">=", "...",
];

/// Tokenize `source`, returning non-overlapping tokens sorted by start.
pub fn tokenize(source: &str, grammar: Grammar) -> Result<Vec<Token>, HighlightError> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar.language())
        .map_err(|e| HighlightError::Engine(format!("failed to load grammar: {e}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| HighlightError::Engine("parser produced no tree".to_string()))?;

    let root = tree.root_node();
    let mut tokens = Vec::new();
    let mut cursor = root.walk();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.start_byte() == node.end_byte() {
            continue;
        }
        if let Some(kind) = classify(node) {
            tokens.push(Token {
                start: node.start_byte(),
                end: node.end_byte(),
                kind,
            });
            continue;
        }

        cursor.reset(node);
        if cursor.goto_first_child() {
            loop {
                stack.push(cursor.node());
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    tokens.sort_by_key(|t| t.start);
    Ok(tokens)
}

fn classify(node: Node<'_>) -> Option<TokenKind> {
    let kind = node.kind();
    if !node.is_named() {
        if KEYWORDS.contains(&kind) {
            return Some(TokenKind::Keyword);
        }
        if OPERATORS.contains(&kind) {
            return Some(TokenKind::Operator);
        }
        return None;
    }

    match kind {
        "comment" => Some(TokenKind::Comment),
        "string" | "template_string" | "regex" => Some(TokenKind::String),
        "number" | "true" | "false" | "null" | "undefined" => Some(TokenKind::Constant),
        "type_identifier" | "predefined_type" => Some(TokenKind::Type),
        "identifier" | "property_identifier" if names_function(node) => Some(TokenKind::Function),
        "identifier" | "shorthand_property_identifier" | "this" => Some(TokenKind::Variable),
        _ => None,
    }
}

/// Whether `node` is the callee of a call or the name of a function.
fn names_function(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "call_expression" | "new_expression" => {
            is_field(parent, "function", node) || is_field(parent, "constructor", node)
        }
        "member_expression" => {
            is_field(parent, "property", node)
                && parent
                    .parent()
                    .is_some_and(|call| call.kind() == "call_expression" && is_field(call, "function", parent))
        }
        "function_declaration" | "function_expression" | "generator_function_declaration"
        | "method_definition" => is_field(parent, "name", node),
        _ => false,
    }
}

fn is_field(parent: Node<'_>, field: &str, child: Node<'_>) -> bool {
    parent.child_by_field_name(field) == Some(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<(&str, TokenKind)> {
        tokenize(source, Grammar::TypeScript)
            .unwrap()
            .into_iter()
            .map(|t| (&source[t.start..t.end], t.kind))
            .collect()
    }

    #[test]
    fn test_language_hints() {
        assert_eq!(Grammar::for_language("ts"), Some(Grammar::TypeScript));
        assert_eq!(Grammar::for_language("JavaScript"), Some(Grammar::TypeScript));
        assert_eq!(Grammar::for_language("tsx"), Some(Grammar::Tsx));
        assert_eq!(Grammar::for_language("python"), None);
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("const name = \"raptor\";"),
            vec![
                ("const", TokenKind::Keyword),
                ("name", TokenKind::Variable),
                ("=", TokenKind::Operator),
                ("\"raptor\"", TokenKind::String),
            ]
        );
    }

    #[test]
    fn test_calls_and_comments() {
        let tokens = kinds("// load\nconsole.log(user, 42);");
        assert!(tokens.contains(&("// load", TokenKind::Comment)));
        assert!(tokens.contains(&("log", TokenKind::Function)));
        assert!(tokens.contains(&("console", TokenKind::Variable)));
        assert!(tokens.contains(&("42", TokenKind::Constant)));
    }

    #[test]
    fn test_function_names_and_types() {
        let tokens = kinds("function show(id: string): User { return null; }");
        assert!(tokens.contains(&("show", TokenKind::Function)));
        assert!(tokens.contains(&("string", TokenKind::Type)));
        assert!(tokens.contains(&("User", TokenKind::Type)));
        assert!(tokens.contains(&("return", TokenKind::Keyword)));
        assert!(tokens.contains(&("null", TokenKind::Constant)));
    }

    #[test]
    fn test_tokens_are_sorted_and_disjoint() {
        let tokens = tokenize("}\n  const a = `x${b}`; /* c */ if (a) {", Grammar::TypeScript).unwrap();
        assert!(!tokens.is_empty());
        for pair in tokens.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_empty_source_has_no_tokens() {
        assert!(tokenize("", Grammar::Tsx).unwrap().is_empty());
    }
}
