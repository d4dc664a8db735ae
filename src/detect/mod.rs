//! Documentation checking: classification, change scope and the doc check.

mod check;
mod classify;
mod rule;
mod runner;
mod scope;
mod types;

pub use check::{check, has_doc_comment};
pub use classify::{classify, is_hook_name};
pub use rule::{Diagnostic, LintContext, RequireDocRule, RuleMeta, RuleOptions, RULE_META};
pub use runner::Runner;
pub use scope::ScopeResolver;
pub use types::{
    Declaration, DeclarationKind, DetectionResult, Finding, ScopeAnnotation, ScopeSelector,
    Violation,
};
