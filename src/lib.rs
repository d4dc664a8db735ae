//! doccheck - change-scoped JSDoc checker.
//!
//! Flags JavaScript/TypeScript functions that lack a `/** ... */` comment:
//! named function declarations, function or arrow expressions bound to a
//! variable, and hooks (`useXxx`). Anonymous callbacks are ignored. Checking
//! can cover every function, or only functions on lines that a diff adds
//! (`new`: working tree vs `HEAD`, `staged`: index vs `HEAD`).
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter parsing into closed `FunctionNode` values
//! - `detect`: classifier, change-scope resolver, doc check, lint rule, runner
//! - `vcs`: git queries (changed files, added lines) behind `VersionControl`
//! - `config`: optional YAML configuration
//! - `docs`: doc-comment extraction and README generation
//! - `report`: output formatting (pretty, JSON)

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod docs;
pub mod report;
pub mod vcs;

pub use analysis::{analyze_file, analyze_source, FileFacts, FunctionNode};
pub use config::Config;
pub use detect::{
    check, classify, Declaration, DeclarationKind, DetectionResult, RequireDocRule, Runner,
    ScopeResolver, ScopeSelector, Violation,
};
pub use vcs::{GitCli, ScopeCache, StaticDiff, VersionControl};
