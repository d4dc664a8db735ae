//! Function extraction shared by the JavaScript and TypeScript grammars.
//!
//! Both grammars use the same node names for everything the checker looks
//! at, so the analyzers only differ in the `Language` they hand in here.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Query, QueryCursor};

use crate::analysis::{BindingContext, Comment, FunctionNode, FunctionSyntax, ParsedFile, Span};

/// Tree-sitter query for every function-like node.
const FUNCTION_QUERY: &str = r#"
(function_declaration) @function
(generator_function_declaration) @function
(function_expression) @function
(arrow_function) @function
"#;

/// Extract all function-like nodes, sorted by position.
pub(super) fn extract_functions(
    language: &Language,
    parsed: &ParsedFile,
) -> anyhow::Result<Vec<FunctionNode>> {
    let query = Query::new(language, FUNCTION_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

    let mut functions = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            if let Some(function) = function_node(parsed, capture.node) {
                functions.push(function);
            }
        }
    }

    functions.sort_by_key(|f| f.span.start_byte);
    Ok(functions)
}

fn function_node(parsed: &ParsedFile, node: Node) -> Option<FunctionNode> {
    let syntax = match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            FunctionSyntax::Declaration {
                name: field_text(parsed, node, "name"),
            }
        }
        // ESTree calls this a FunctionDeclaration with a null id
        "function_expression" if is_default_export(node) => FunctionSyntax::Declaration {
            name: field_text(parsed, node, "name"),
        },
        "function_expression" => FunctionSyntax::Expression {
            name: field_text(parsed, node, "name"),
            context: binding_context(parsed, node),
        },
        "arrow_function" => FunctionSyntax::Arrow {
            context: binding_context(parsed, node),
        },
        _ => return None,
    };

    let outer = match syntax.context() {
        Some(BindingContext::Variable { .. }) => {
            let value = unparenthesized(node);
            value.parent().unwrap_or(value)
        }
        _ => node,
    };

    Some(FunctionNode {
        syntax,
        line: outer.start_position().row + 1,
        span: Span::from_node(node),
        leading_comments: leading_comments(parsed, comment_anchor(outer)),
    })
}

fn field_text(parsed: &ParsedFile, node: Node, field: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| parsed.node_text(n).to_string())
        .filter(|s| !s.is_empty())
}

/// The outermost `( ... )` wrapping `node`, or `node` itself.
fn unparenthesized(node: Node) -> Node {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.kind() != "parenthesized_expression" {
            break;
        }
        current = parent;
    }
    current
}

fn binding_context(parsed: &ParsedFile, node: Node) -> BindingContext {
    let node = unparenthesized(node);
    let Some(parent) = node.parent() else {
        return BindingContext::Other;
    };

    match parent.kind() {
        "variable_declarator" => {
            let is_value = parent.child_by_field_name("value") == Some(node);
            match parent.child_by_field_name("name") {
                // destructuring patterns have no single binding name
                Some(name) if is_value && name.kind() == "identifier" => BindingContext::Variable {
                    name: parsed.node_text(name).to_string(),
                },
                _ => BindingContext::Other,
            }
        }
        "arguments" => BindingContext::CallArgument,
        _ => BindingContext::Other,
    }
}

fn is_default_export(node: Node) -> bool {
    match node.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent
            .children(&mut parent.walk())
            .any(|child| child.kind() == "default"),
        _ => false,
    }
}

/// The node whose preceding comments document `outer`.
///
/// A doc comment sits in front of the whole statement: before `export`, and
/// before `const` when the declarator is the first one of its declaration.
fn comment_anchor(outer: Node) -> Node {
    let mut anchor = outer;

    if anchor.kind() == "variable_declarator" {
        match anchor.parent() {
            Some(declaration) if is_first_declarator(anchor) => anchor = declaration,
            _ => return anchor,
        }
    }

    match anchor.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => anchor,
    }
}

fn is_first_declarator(declarator: Node) -> bool {
    let mut sibling = declarator.prev_named_sibling();
    while let Some(node) = sibling {
        if node.kind() == "variable_declarator" {
            return false;
        }
        sibling = node.prev_named_sibling();
    }
    true
}

/// Comments directly before `anchor` with no other token in between.
fn leading_comments(parsed: &ParsedFile, anchor: Node) -> Vec<Comment> {
    let mut comments = Vec::new();
    let mut sibling = anchor.prev_sibling();

    while let Some(node) = sibling {
        if node.kind() != "comment" {
            break;
        }
        if let Some(comment) = Comment::parse(parsed.node_text(node), node.start_position().row + 1)
        {
            comments.push(comment);
        }
        sibling = node.prev_sibling();
    }

    comments.reverse();
    comments
}
