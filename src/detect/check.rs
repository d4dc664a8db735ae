//! Doc-comment presence check.

use crate::analysis::Comment;

use super::{Declaration, ScopeSelector, Violation};

/// Whether any of `comments` is a `/** ... */` block.
pub fn has_doc_comment(comments: &[Comment]) -> bool {
    comments.iter().any(Comment::is_doc_block)
}

/// Check one in-scope declaration against its leading comments.
///
/// Pure: the same inputs always give the same answer.
pub fn check(
    declaration: &Declaration,
    comments: &[Comment],
    selector: ScopeSelector,
) -> Option<Violation> {
    if has_doc_comment(comments) {
        return None;
    }

    Some(Violation {
        name: declaration.name.clone(),
        line: declaration.line,
        annotation: selector.annotation(),
    })
}
