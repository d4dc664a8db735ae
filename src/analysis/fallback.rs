//! Regex-based function scanner.
//!
//! Degraded mode used when the crate is built without the `tree-sitter`
//! feature. It only recognizes declarations that start a line:
//! `function name`, and `const|let|var name = function|arrow`. Nested or
//! multi-line signatures are missed (false negatives), and anonymous
//! callbacks are never seen at all, which matches what the classifier
//! would drop anyway.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::{BindingContext, Comment, FileFacts, FunctionNode, FunctionSyntax, Span};

lazy_static! {
    static ref DECLARATION: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:async[ \t]+)?(?:function[ \t]*\*?[ \t]*(?P<func>[A-Za-z_$][\w$]*)|(?:const|let|var)[ \t]+(?P<var>[A-Za-z_$][\w$]*)[^=\n]*=[ \t]*(?:async[ \t]+)?(?P<init>function\b|\([^)\n]*\)[^=\n]*=>|[A-Za-z_$][\w$]*[ \t]*=>))"
    )
    .unwrap();
}

/// Scan source text for function declarations.
pub fn scan(path: &Path, source: &[u8]) -> anyhow::Result<FileFacts> {
    let text = std::str::from_utf8(source)?;
    let mut facts = FileFacts::empty(&path.to_string_lossy(), "ecmascript-regex");

    for caps in DECLARATION.captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        // the match starts at indentation; anchor on the first real token
        let indent = whole.as_str().len() - whole.as_str().trim_start().len();
        let start = whole.start() + indent;

        let syntax = if let Some(name) = caps.name("func") {
            FunctionSyntax::Declaration {
                name: Some(name.as_str().to_string()),
            }
        } else if let (Some(name), Some(init)) = (caps.name("var"), caps.name("init")) {
            let context = BindingContext::Variable {
                name: name.as_str().to_string(),
            };
            if init.as_str().starts_with("function") {
                FunctionSyntax::Expression {
                    name: None,
                    context,
                }
            } else {
                FunctionSyntax::Arrow { context }
            }
        } else {
            continue;
        };

        let span = Span::from_offsets(text, start, whole.end());
        facts.functions.push(FunctionNode {
            syntax,
            line: span.start_line,
            span,
            leading_comments: comments_before(text, start),
        });
    }

    Ok(facts)
}

/// Comments that end right before `offset`, separated only by whitespace.
fn comments_before(text: &str, offset: usize) -> Vec<Comment> {
    let mut comments = Vec::new();
    let mut rest = text[..offset].trim_end();

    loop {
        if rest.ends_with("*/") {
            let Some(open) = rest.rfind("/*") else {
                break;
            };
            let line = line_of(text, open);
            if let Some(comment) = Comment::parse(&rest[open..], line) {
                comments.push(comment);
            }
            rest = rest[..open].trim_end();
            continue;
        }

        let line_start = rest.rfind('\n').map(|p| p + 1).unwrap_or(0);
        let last_line = rest[line_start..].trim_start();
        if last_line.starts_with("//") {
            let open = rest.len() - last_line.len();
            let line = line_of(text, open);
            if let Some(comment) = Comment::parse(last_line, line) {
                comments.push(comment);
            }
            rest = rest[..line_start].trim_end();
            continue;
        }

        break;
    }

    comments.reverse();
    comments
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_declarations() {
        let source = r#"
/**
 * Documented.
 */
export function documented() {}

// line comment only
export const useThing = async (a: number): Promise<void> => {};

const legacy = function () {};
let single = x => x;

list.map((item) => item.id);
"#;
        let facts = scan(Path::new("a.ts"), source.as_bytes()).unwrap();
        assert_eq!(facts.functions.len(), 4);

        let documented = &facts.functions[0];
        assert_eq!(documented.line, 5);
        assert!(documented.leading_comments[0].is_doc_block());

        let thing = &facts.functions[1];
        assert_eq!(
            thing.syntax,
            FunctionSyntax::Arrow {
                context: BindingContext::Variable {
                    name: "useThing".to_string()
                }
            }
        );
        assert_eq!(thing.line, 8);
        assert!(!thing.leading_comments[0].is_doc_block());

        assert!(matches!(
            facts.functions[2].syntax,
            FunctionSyntax::Expression { .. }
        ));
        assert_eq!(facts.functions[3].line, 11);
    }

    #[test]
    fn test_comment_must_be_adjacent() {
        let source = "/** orphan */\nconst x = 1;\nfunction foo() {}\n";
        let facts = scan(Path::new("a.js"), source.as_bytes()).unwrap();
        assert_eq!(facts.functions.len(), 1);
        assert!(facts.functions[0].leading_comments.is_empty());
    }
}
