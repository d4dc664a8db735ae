//! Change-scope resolution.
//!
//! In `full` mode everything is in scope. In `new` and `staged` mode a
//! declaration is in scope only when its file is in the changed-file set and
//! its line is one the diff adds. Version-control failures never escape: they
//! are logged and the affected set is treated as empty.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::vcs::{
    normalize_path, AddedLineSet, ChangedFileSet, DiffScope, ScopeCache, VersionControl,
};

use super::ScopeSelector;

/// Answers "is this line of this file in scope" for one selector.
pub struct ScopeResolver<'a> {
    selector: ScopeSelector,
    vcs: &'a dyn VersionControl,
    root: PathBuf,
    source_root: Option<String>,
    cache: Option<&'a ScopeCache>,
}

impl<'a> ScopeResolver<'a> {
    /// An uncached resolver: every query goes to `vcs`.
    pub fn new(selector: ScopeSelector, vcs: &'a dyn VersionControl, root: &Path) -> Self {
        Self {
            selector,
            vcs,
            root: root.canonicalize().unwrap_or_else(|_| root.to_path_buf()),
            source_root: None,
            cache: None,
        }
    }

    /// A resolver that memoizes query results in `cache` for one run.
    pub fn with_cache(
        selector: ScopeSelector,
        vcs: &'a dyn VersionControl,
        root: &Path,
        cache: &'a ScopeCache,
    ) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(selector, vcs, root)
        }
    }

    /// Only consider changed files under `source_root` (repository-relative).
    pub fn restrict_to(mut self, source_root: Option<&str>) -> Self {
        self.source_root = source_root.map(String::from);
        self
    }

    pub fn selector(&self) -> ScopeSelector {
        self.selector
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `line` of `file` should be checked.
    pub fn in_scope(&self, file: &Path, line: usize) -> bool {
        let Some(scope) = self.selector.diff_scope() else {
            return true;
        };
        let Some(rel) = self.relative_path(file) else {
            debug!(file = %file.display(), "file outside repository root");
            return false;
        };

        if !self.changed_in(scope).contains(&rel) {
            return false;
        }
        self.added_in(scope, &rel).contains(line)
    }

    /// Changed files for this resolver's selector; empty in `full` mode.
    pub fn changed_files(&self) -> ChangedFileSet {
        match self.selector.diff_scope() {
            Some(scope) => self.changed_in(scope),
            None => ChangedFileSet::new(),
        }
    }

    /// Added lines of `file` for this resolver's selector; empty in `full` mode.
    pub fn added_lines(&self, file: &Path) -> AddedLineSet {
        match (self.selector.diff_scope(), self.relative_path(file)) {
            (Some(scope), Some(rel)) => self.added_in(scope, &rel),
            _ => AddedLineSet::new(),
        }
    }

    /// `file` relative to the repository root, `/`-separated.
    ///
    /// Relative inputs that do not exist on disk are taken as already
    /// repository-relative.
    pub fn relative_path(&self, file: &Path) -> Option<String> {
        let absolute = if file.is_absolute() {
            Some(file.canonicalize().unwrap_or_else(|_| file.to_path_buf()))
        } else {
            file.canonicalize().ok()
        };

        match absolute {
            Some(abs) => abs
                .strip_prefix(&self.root)
                .ok()
                .map(|rel| normalize_path(&rel.to_string_lossy())),
            None => Some(normalize_path(&file.to_string_lossy())),
        }
    }

    fn changed_in(&self, scope: DiffScope) -> ChangedFileSet {
        let compute = || match self.vcs.changed_files(scope) {
            Ok(paths) => ChangedFileSet::from_paths(paths, self.source_root.as_deref()),
            Err(e) => {
                debug!(scope = scope.as_str(), error = %e, "changed files unavailable");
                ChangedFileSet::new()
            }
        };

        match self.cache {
            Some(cache) => cache.changed_files_or_insert_with(scope, compute),
            None => compute(),
        }
    }

    fn added_in(&self, scope: DiffScope, rel: &str) -> AddedLineSet {
        let compute = || match self.vcs.added_lines(scope, rel) {
            Ok(lines) => lines.into_iter().collect(),
            Err(e) => {
                debug!(scope = scope.as_str(), file = rel, error = %e, "added lines unavailable");
                AddedLineSet::new()
            }
        };

        match self.cache {
            Some(cache) => cache.added_lines_or_insert_with(scope, rel, compute),
            None => compute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::{StaticDiff, VcsError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails or answers from a fixed diff.
    struct Counting {
        inner: Option<StaticDiff>,
        calls: AtomicUsize,
    }

    impl VersionControl for Counting {
        fn changed_files(&self, scope: DiffScope) -> Result<Vec<String>, VcsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.inner {
                Some(diff) => diff.changed_files(scope),
                None => Err(VcsError::NotARepository("/nowhere".to_string())),
            }
        }

        fn added_lines(&self, scope: DiffScope, path: &str) -> Result<Vec<usize>, VcsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.inner {
                Some(diff) => diff.added_lines(scope, path),
                None => Err(VcsError::NotARepository("/nowhere".to_string())),
            }
        }
    }

    fn root() -> PathBuf {
        PathBuf::from("/nonexistent-repo-root")
    }

    #[test]
    fn test_full_mode_never_queries() {
        let vcs = Counting {
            inner: None,
            calls: AtomicUsize::new(0),
        };
        let resolver = ScopeResolver::new(ScopeSelector::Full, &vcs, &root());
        assert!(resolver.in_scope(Path::new("src/a.ts"), 1));
        assert_eq!(vcs.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_line_must_be_added_in_changed_file() {
        let vcs = StaticDiff::new().with_file(DiffScope::WorkingTree, "src/a.ts", &[3, 4, 5]);
        let resolver = ScopeResolver::new(ScopeSelector::New, &vcs, &root());

        assert!(resolver.in_scope(Path::new("src/a.ts"), 4));
        assert!(!resolver.in_scope(Path::new("src/a.ts"), 6));
        assert!(!resolver.in_scope(Path::new("src/b.ts"), 4));

        // the staged index has nothing
        let staged = ScopeResolver::new(ScopeSelector::Staged, &vcs, &root());
        assert!(!staged.in_scope(Path::new("src/a.ts"), 4));
    }

    #[test]
    fn test_source_root_restriction() {
        let vcs = StaticDiff::new()
            .with_file(DiffScope::WorkingTree, "src/a.ts", &[1])
            .with_file(DiffScope::WorkingTree, "scripts/b.ts", &[1]);
        let resolver =
            ScopeResolver::new(ScopeSelector::New, &vcs, &root()).restrict_to(Some("src"));

        assert_eq!(resolver.changed_files().len(), 1);
        assert!(resolver.in_scope(Path::new("src/a.ts"), 1));
        assert!(!resolver.in_scope(Path::new("scripts/b.ts"), 1));
    }

    #[test]
    fn test_failures_degrade_to_out_of_scope() {
        let vcs = Counting {
            inner: None,
            calls: AtomicUsize::new(0),
        };
        let resolver = ScopeResolver::new(ScopeSelector::Staged, &vcs, &root());
        assert!(!resolver.in_scope(Path::new("src/a.ts"), 1));
        assert!(resolver.changed_files().is_empty());
    }

    #[test]
    fn test_uncached_requeries_every_call() {
        let vcs = Counting {
            inner: Some(StaticDiff::new().with_file(DiffScope::WorkingTree, "src/a.ts", &[1, 2])),
            calls: AtomicUsize::new(0),
        };
        let resolver = ScopeResolver::new(ScopeSelector::New, &vcs, &root());
        resolver.in_scope(Path::new("src/a.ts"), 1);
        resolver.in_scope(Path::new("src/a.ts"), 2);
        assert_eq!(vcs.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_cached_queries_once_per_pair() {
        let vcs = Counting {
            inner: Some(StaticDiff::new().with_file(DiffScope::WorkingTree, "src/a.ts", &[1, 2])),
            calls: AtomicUsize::new(0),
        };
        let cache = ScopeCache::new();
        let resolver = ScopeResolver::with_cache(ScopeSelector::New, &vcs, &root(), &cache);
        for line in 1..=5 {
            resolver.in_scope(Path::new("src/a.ts"), line);
        }
        // one changed-files query plus one added-lines query
        assert_eq!(vcs.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_relative_path_of_absolute_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("src").join("a.ts");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "").unwrap();

        let vcs = StaticDiff::new();
        let resolver = ScopeResolver::new(ScopeSelector::New, &vcs, temp.path());
        assert_eq!(resolver.relative_path(&file).as_deref(), Some("src/a.ts"));
        assert_eq!(resolver.relative_path(Path::new("/elsewhere/x.ts")), None);
    }
}
