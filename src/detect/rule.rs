//! The `require-jsdoc` lint rule.
//!
//! Hosts drive the rule node by node: for every function-like node in a file
//! they call [`RequireDocRule::visit`] with the file's context and a reporting
//! callback. The rule emits at most one diagnostic per node.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{FileFacts, FunctionNode};
use crate::vcs::VersionControl;

use super::{check, classify, ScopeResolver, ScopeSelector};

/// Static description of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    pub name: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
    pub recommended: bool,
}

pub const RULE_META: RuleMeta = RuleMeta {
    name: "require-jsdoc",
    kind: "suggestion",
    description: "Require JSDoc comments for functions, bound arrows and hooks",
    recommended: false,
};

/// Rule configuration, as written in a lint config: `{ "mode": "new" }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOptions {
    #[serde(default)]
    pub mode: ScopeSelector,
}

/// Per-file context supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct LintContext<'a> {
    pub filename: &'a Path,
}

/// A reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

/// Flags checkable declarations without a `/** ... */` comment.
pub struct RequireDocRule<'a> {
    options: RuleOptions,
    resolver: ScopeResolver<'a>,
}

impl<'a> RequireDocRule<'a> {
    /// `root` is the repository root diff paths are relative to.
    ///
    /// The rule does not cache version-control results: editors keep a rule
    /// alive across edits, so every visit sees the current diff.
    pub fn new(options: RuleOptions, vcs: &'a dyn VersionControl, root: &Path) -> Self {
        Self {
            options,
            resolver: ScopeResolver::new(options.mode, vcs, root),
        }
    }

    pub fn mode(&self) -> ScopeSelector {
        self.options.mode
    }

    /// Visit one node, reporting through `report`.
    pub fn visit<F>(&self, ctx: &LintContext<'_>, node: &FunctionNode, mut report: F)
    where
        F: FnMut(Diagnostic),
    {
        let Some(declaration) = classify(node) else {
            return;
        };
        if !self.resolver.in_scope(ctx.filename, declaration.line) {
            return;
        }
        if let Some(violation) = check(&declaration, &node.leading_comments, self.options.mode) {
            report(Diagnostic {
                line: violation.line,
                message: violation.message(),
            });
        }
    }

    /// Visit every node of an analyzed file.
    pub fn lint_facts(&self, ctx: &LintContext<'_>, facts: &FileFacts) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for node in &facts.functions {
            self.visit(ctx, node, |d| diagnostics.push(d));
        }
        diagnostics
    }
}
