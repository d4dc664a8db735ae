//! Detection runner for whole-tree scans.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::analysis::{self, FileFacts};
use crate::vcs::{ScopeCache, VersionControl};

use super::{check, classify, DetectionResult, Finding, ScopeResolver, ScopeSelector};

/// Checks a set of files under one selector.
///
/// Version-control answers are memoized for the lifetime of the runner, so
/// git is asked about each file at most once per scan.
pub struct Runner<'a> {
    root: PathBuf,
    selector: ScopeSelector,
    vcs: &'a dyn VersionControl,
    source_root: Option<String>,
    cache: ScopeCache,
}

impl<'a> Runner<'a> {
    /// Create a runner for the repository at `root`.
    pub fn new<P: AsRef<Path>>(root: P, selector: ScopeSelector, vcs: &'a dyn VersionControl) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            selector,
            vcs,
            source_root: None,
            cache: ScopeCache::new(),
        }
    }

    /// Restrict change detection to files under `source_root` (repository-relative).
    pub fn source_root(mut self, source_root: Option<&str>) -> Self {
        self.source_root = source_root.map(String::from);
        self
    }

    pub fn selector(&self) -> ScopeSelector {
        self.selector
    }

    fn resolver(&self) -> ScopeResolver<'_> {
        ScopeResolver::with_cache(self.selector, self.vcs, &self.root, &self.cache)
            .restrict_to(self.source_root.as_deref())
    }

    /// Supported files that changed for the runner's selector, as paths under
    /// the repository root. Deleted files are dropped. Empty in `full` mode.
    pub fn changed_files(&self) -> Vec<PathBuf> {
        let resolver = self.resolver();
        resolver
            .changed_files()
            .iter()
            .map(|rel| resolver.root().join(rel))
            .filter(|path| analysis::is_supported(path) && path.is_file())
            .collect()
    }

    /// Analyze and check every file.
    pub fn run(&self, files: &[PathBuf]) -> anyhow::Result<DetectionResult> {
        let resolver = self.resolver();
        let mut result = DetectionResult::new(self.selector);

        for file in files {
            let facts = match analysis::analyze_file(file) {
                Ok(facts) => facts,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping file");
                    continue;
                }
            };
            result.scanned += 1;

            let label = resolver
                .relative_path(file)
                .unwrap_or_else(|| file.display().to_string());
            self.check_file(&resolver, file, &label, &facts, &mut result);
        }

        result.sort();
        Ok(result)
    }

    fn check_file(
        &self,
        resolver: &ScopeResolver<'_>,
        file: &Path,
        label: &str,
        facts: &FileFacts,
        result: &mut DetectionResult,
    ) {
        if facts.has_parse_errors {
            debug!(file = label, "parsed with errors");
        }

        for node in &facts.functions {
            let Some(declaration) = classify(node) else {
                continue;
            };
            if !resolver.in_scope(file, declaration.line) {
                continue;
            }
            if let Some(violation) = check(&declaration, &node.leading_comments, self.selector) {
                result.findings.push(Finding::new(label, &violation));
            }
        }
    }
}
