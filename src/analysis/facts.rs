//! Fact structures extracted from AST analysis.

use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    #[cfg(feature = "tree-sitter")]
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// Create a span from byte offsets into `source`.
    pub fn from_offsets(source: &str, start_byte: usize, end_byte: usize) -> Self {
        let (start_line, start_col) = line_col(source, start_byte);
        let (end_line, end_col) = line_col(source, end_byte);
        Self {
            start_byte,
            end_byte,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// 1-based line and column of a byte offset.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let col = match before.iter().rposition(|&b| b == b'\n') {
        Some(pos) => offset - pos,
        None => offset + 1,
    };
    (line, col)
}

/// Comment flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `/* ... */`, including `/** ... */`
    Block,
    /// `// ...`
    Line,
}

/// A comment token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text between the delimiters. A `/** doc */` comment has value `* doc `.
    pub value: String,
    /// Start line (1-indexed).
    pub line: usize,
}

impl Comment {
    /// Build a comment from its raw source text.
    ///
    /// Returns None for text that is not a JS comment.
    pub fn parse(text: &str, line: usize) -> Option<Self> {
        if let Some(rest) = text.strip_prefix("/*") {
            let value = rest.strip_suffix("*/").unwrap_or(rest);
            return Some(Self {
                kind: CommentKind::Block,
                value: value.to_string(),
                line,
            });
        }

        text.strip_prefix("//").map(|rest| Self {
            kind: CommentKind::Line,
            value: rest.trim_end_matches(['\r', '\n']).to_string(),
            line,
        })
    }

    /// Structured doc comment: a block comment whose value starts with `*`.
    pub fn is_doc_block(&self) -> bool {
        self.kind == CommentKind::Block && self.value.starts_with('*')
    }
}

/// Syntactic role of a function or arrow expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingContext {
    /// Initializer of a variable declarator: `const name = ...`.
    Variable { name: String },
    /// Passed directly as a call argument: `list.map(() => ...)`.
    CallArgument,
    /// Anything else: object property, assignment, return value, IIFE.
    Other,
}

/// Shape of a function-like node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionSyntax {
    /// `function name() {}`, including the anonymous `export default function () {}`.
    Declaration { name: Option<String> },
    /// `(...) => ...`
    Arrow { context: BindingContext },
    /// `function [name]() {}` used as an expression.
    Expression {
        name: Option<String>,
        context: BindingContext,
    },
}

impl FunctionSyntax {
    /// Short label for logs and debugging output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionSyntax::Declaration { .. } => "function declaration",
            FunctionSyntax::Arrow { .. } => "arrow function",
            FunctionSyntax::Expression { .. } => "function expression",
        }
    }

    /// The binding context, for the expression forms.
    pub fn context(&self) -> Option<&BindingContext> {
        match self {
            FunctionSyntax::Declaration { .. } => None,
            FunctionSyntax::Arrow { context } | FunctionSyntax::Expression { context, .. } => {
                Some(context)
            }
        }
    }
}

/// A function-like node, as seen by the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    pub syntax: FunctionSyntax,
    /// Line of the outer construct: the `function` keyword for declarations,
    /// the variable declarator for bound expressions.
    pub line: usize,
    /// Span of the function node itself.
    pub span: Span,
    /// Comments immediately preceding the outer construct, in source order.
    pub leading_comments: Vec<Comment>,
}

impl FunctionNode {
    /// True for arrows and unnamed function expressions passed straight into a call.
    pub fn is_anonymous_callback_arg(&self) -> bool {
        match &self.syntax {
            FunctionSyntax::Arrow { context } => *context == BindingContext::CallArgument,
            FunctionSyntax::Expression { name, context } => {
                name.is_none() && *context == BindingContext::CallArgument
            }
            FunctionSyntax::Declaration { .. } => false,
        }
    }
}

/// All facts extracted from a single file.
#[derive(Debug, Clone)]
pub struct FileFacts {
    /// File path.
    pub path: String,
    /// Language identifier.
    pub language: String,
    /// Function-like nodes in source order.
    pub functions: Vec<FunctionNode>,
    /// Whether the file had parse errors.
    pub has_parse_errors: bool,
}

impl FileFacts {
    /// Create empty facts for a file.
    pub fn empty(path: &str, language: &str) -> Self {
        Self {
            path: path.to_string(),
            language: language.to_string(),
            functions: Vec::new(),
            has_parse_errors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_parse() {
        let doc = Comment::parse("/** Adds numbers */", 3).unwrap();
        assert_eq!(doc.kind, CommentKind::Block);
        assert_eq!(doc.value, "* Adds numbers ");
        assert!(doc.is_doc_block());

        let plain = Comment::parse("/* plain */", 1).unwrap();
        assert_eq!(plain.kind, CommentKind::Block);
        assert!(!plain.is_doc_block());

        let line = Comment::parse("// * not a doc block", 1).unwrap();
        assert_eq!(line.kind, CommentKind::Line);
        assert!(!line.is_doc_block());

        // `/**/` is an empty block comment, not a doc block
        let empty = Comment::parse("/**/", 1).unwrap();
        assert_eq!(empty.value, "");
        assert!(!empty.is_doc_block());

        assert!(Comment::parse("#!/usr/bin/env node", 1).is_none());
    }

    #[test]
    fn test_span_from_offsets() {
        let source = "const a = 1;\nfunction foo() {}\n";
        let start = source.find("function").unwrap();
        let span = Span::from_offsets(source, start, start + 8);
        assert_eq!(span.start_line, 2);
        assert_eq!(span.start_col, 1);
        assert_eq!(span.to_string(), "2:1");
    }

    #[test]
    fn test_anonymous_callback_arg() {
        let span = Span::from_offsets("", 0, 0);
        let callback = FunctionNode {
            syntax: FunctionSyntax::Arrow {
                context: BindingContext::CallArgument,
            },
            line: 1,
            span: span.clone(),
            leading_comments: vec![],
        };
        assert!(callback.is_anonymous_callback_arg());

        let named = FunctionNode {
            syntax: FunctionSyntax::Expression {
                name: Some("handler".to_string()),
                context: BindingContext::CallArgument,
            },
            line: 1,
            span,
            leading_comments: vec![],
        };
        assert!(!named.is_anonymous_callback_arg());
    }
}
