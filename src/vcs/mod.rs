//! Version-control queries for change-scoped checking.
//!
//! Two questions are asked of the repository:
//! - which files differ for a diff scope (`--name-only`)
//! - which new-side line numbers a zero-context diff of one file adds
//!
//! `GitCli` answers them by invoking the `git` executable. `StaticDiff` is an
//! in-memory implementation for lint hosts that already have the data and
//! for tests.

mod cache;
mod changes;
mod git;
mod hunk;

pub use cache::ScopeCache;
pub use changes::{normalize_path, ChangedFileSet};
pub use git::{GitCli, DEFAULT_TIMEOUT};
pub use hunk::{parse_added_lines, parse_hunk_header, AddedLineSet, HunkRange};

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while querying version control.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("not a git repository: {0}")]
    NotARepository(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which pair of trees a diff compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffScope {
    /// Working tree against the last commit (`git diff HEAD`).
    WorkingTree,
    /// Index against the last commit (`git diff --cached`).
    Index,
}

impl DiffScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffScope::WorkingTree => "working-tree",
            DiffScope::Index => "index",
        }
    }
}

/// Source of changed-file and added-line information.
pub trait VersionControl: Send + Sync {
    /// Paths (repository-relative, `/`-separated) that differ in `scope`.
    fn changed_files(&self, scope: DiffScope) -> Result<Vec<String>, VcsError>;

    /// New-side line numbers added to `path` in `scope`.
    fn added_lines(&self, scope: DiffScope, path: &str) -> Result<Vec<usize>, VcsError>;
}

/// Fixed diff data held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticDiff {
    changed: HashMap<DiffScope, Vec<String>>,
    added: HashMap<(DiffScope, String), Vec<usize>>,
}

impl StaticDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a changed file and the lines it adds in `scope`.
    pub fn with_file(mut self, scope: DiffScope, path: &str, lines: &[usize]) -> Self {
        let path = normalize_path(path);
        self.changed.entry(scope).or_default().push(path.clone());
        self.added
            .entry((scope, path))
            .or_default()
            .extend_from_slice(lines);
        self
    }

    /// Record a file's diff output in `scope`; added lines come from its hunk headers.
    pub fn with_diff(self, scope: DiffScope, path: &str, diff: &str) -> Self {
        let lines = parse_added_lines(diff);
        self.with_file(scope, path, &lines)
    }
}

impl VersionControl for StaticDiff {
    fn changed_files(&self, scope: DiffScope) -> Result<Vec<String>, VcsError> {
        Ok(self.changed.get(&scope).cloned().unwrap_or_default())
    }

    fn added_lines(&self, scope: DiffScope, path: &str) -> Result<Vec<usize>, VcsError> {
        Ok(self
            .added
            .get(&(scope, normalize_path(path)))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_diff_scopes_are_separate() {
        let vcs = StaticDiff::new()
            .with_file(DiffScope::WorkingTree, "src/a.ts", &[3, 4, 5])
            .with_diff(DiffScope::Index, "./src/b.ts", "@@ -1,0 +2,2 @@\n+a\n+b\n");

        assert_eq!(vcs.changed_files(DiffScope::WorkingTree).unwrap(), vec!["src/a.ts"]);
        assert_eq!(vcs.changed_files(DiffScope::Index).unwrap(), vec!["src/b.ts"]);
        assert_eq!(vcs.added_lines(DiffScope::Index, "src/b.ts").unwrap(), vec![2, 3]);
        assert!(vcs
            .added_lines(DiffScope::Index, "src/a.ts")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = VcsError::Failed {
            command: "git diff HEAD".to_string(),
            status: "exit status: 128".to_string(),
            stderr: "fatal: bad revision 'HEAD'".to_string(),
        };
        assert!(err.to_string().contains("bad revision"));
    }
}
