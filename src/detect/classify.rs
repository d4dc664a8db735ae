//! Declaration classification.
//!
//! Decides which function-like nodes need a doc comment at all. Anonymous
//! callbacks (`list.map(x => ...)`) and expressions that are not bound to a
//! name are never checked.

use crate::analysis::{BindingContext, FunctionNode, FunctionSyntax};

use super::{Declaration, DeclarationKind};

/// Classify a function-like node, or `None` when it is not checked.
pub fn classify(node: &FunctionNode) -> Option<Declaration> {
    if node.is_anonymous_callback_arg() {
        return None;
    }

    let (kind, name) = match &node.syntax {
        FunctionSyntax::Declaration { name } => (DeclarationKind::NamedFunction, name.clone()),
        FunctionSyntax::Arrow { context } | FunctionSyntax::Expression { context, .. } => {
            match context {
                BindingContext::Variable { name } => {
                    (DeclarationKind::NamedArrow, Some(name.clone()))
                }
                BindingContext::CallArgument | BindingContext::Other => return None,
            }
        }
    };

    let kind = match name.as_deref() {
        Some(n) if is_hook_name(n) => DeclarationKind::Hook,
        _ => kind,
    };

    Some(Declaration {
        kind,
        name,
        line: node.line,
    })
}

/// `use`, optionally followed by an uppercase letter or digit.
///
/// `useState`, `use2D` and a bare `use` are hooks; `userService` and
/// `useless` are not.
pub fn is_hook_name(name: &str) -> bool {
    match name.strip_prefix("use") {
        Some(rest) => rest
            .chars()
            .next()
            .map(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .unwrap_or(true),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Span;

    fn node(syntax: FunctionSyntax, line: usize) -> FunctionNode {
        FunctionNode {
            syntax,
            line,
            span: Span::from_offsets("", 0, 0),
            leading_comments: vec![],
        }
    }

    fn bound(name: &str) -> BindingContext {
        BindingContext::Variable {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_named_function() {
        let decl = classify(&node(
            FunctionSyntax::Declaration {
                name: Some("foo".to_string()),
            },
            4,
        ))
        .unwrap();
        assert_eq!(decl.kind, DeclarationKind::NamedFunction);
        assert_eq!(decl.name.as_deref(), Some("foo"));
        assert_eq!(decl.line, 4);
    }

    #[test]
    fn test_default_export_without_name() {
        let decl = classify(&node(FunctionSyntax::Declaration { name: None }, 1)).unwrap();
        assert_eq!(decl.kind, DeclarationKind::NamedFunction);
        assert!(decl.name.is_none());
    }

    #[test]
    fn test_bound_arrow_and_expression() {
        let arrow = classify(&node(
            FunctionSyntax::Arrow {
                context: bound("handler"),
            },
            7,
        ))
        .unwrap();
        assert_eq!(arrow.kind, DeclarationKind::NamedArrow);
        assert_eq!(arrow.name.as_deref(), Some("handler"));

        // the binding name wins over the expression's own name
        let expr = classify(&node(
            FunctionSyntax::Expression {
                name: Some("inner".to_string()),
                context: bound("outer"),
            },
            2,
        ))
        .unwrap();
        assert_eq!(expr.name.as_deref(), Some("outer"));
    }

    #[test]
    fn test_anonymous_callback_is_not_a_declaration() {
        let callback = node(
            FunctionSyntax::Arrow {
                context: BindingContext::CallArgument,
            },
            1,
        );
        assert!(classify(&callback).is_none());

        let expr = node(
            FunctionSyntax::Expression {
                name: None,
                context: BindingContext::CallArgument,
            },
            1,
        );
        assert!(classify(&expr).is_none());
    }

    #[test]
    fn test_unbound_expressions_are_skipped() {
        let property = node(
            FunctionSyntax::Arrow {
                context: BindingContext::Other,
            },
            1,
        );
        assert!(classify(&property).is_none());

        let named_callback = node(
            FunctionSyntax::Expression {
                name: Some("onDone".to_string()),
                context: BindingContext::CallArgument,
            },
            1,
        );
        assert!(classify(&named_callback).is_none());
    }

    #[test]
    fn test_hook_tagging() {
        let hook = classify(&node(
            FunctionSyntax::Arrow {
                context: bound("useSomething"),
            },
            1,
        ))
        .unwrap();
        assert_eq!(hook.kind, DeclarationKind::Hook);

        let declared_hook = classify(&node(
            FunctionSyntax::Declaration {
                name: Some("useAuth".to_string()),
            },
            1,
        ))
        .unwrap();
        assert_eq!(declared_hook.kind, DeclarationKind::Hook);

        let service = classify(&node(
            FunctionSyntax::Arrow {
                context: bound("userService"),
            },
            1,
        ))
        .unwrap();
        assert_eq!(service.kind, DeclarationKind::NamedArrow);
    }

    #[test]
    fn test_is_hook_name() {
        assert!(is_hook_name("use"));
        assert!(is_hook_name("useState"));
        assert!(is_hook_name("use2D"));
        assert!(!is_hook_name("userService"));
        assert!(!is_hook_name("useless"));
        assert!(!is_hook_name("reuseThing"));
    }
}
