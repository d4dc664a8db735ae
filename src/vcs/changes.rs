//! Changed-file sets reported by `diff --name-only`.

use std::collections::BTreeSet;

/// Repository-relative, `/`-separated paths of changed files, restricted
/// to a monitored source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFileSet {
    paths: BTreeSet<String>,
}

impl ChangedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw path output, keeping only paths under `source_root`.
    ///
    /// A root of `None`, `""` or `"."` keeps everything.
    pub fn from_paths<I, S>(paths: I, source_root: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = source_root
            .map(normalize_path)
            .filter(|r| !r.is_empty() && r != ".");

        let paths = paths
            .into_iter()
            .map(|p| normalize_path(p.as_ref()))
            .filter(|p| !p.is_empty())
            .filter(|p| match &root {
                Some(root) => is_under(p, root),
                None => true,
            })
            .collect();

        Self { paths }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(&normalize_path(path))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

/// Normalize a path the way git prints it: trimmed, unquoted, `/`-separated,
/// without a leading `./`.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);

    let mut path = unquoted.replace('\\', "/");
    while let Some(rest) = path.strip_prefix("./") {
        path = rest.to_string();
    }
    path.trim_end_matches('/').to_string()
}

fn is_under(path: &str, root: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}
